// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar helpers for monthly schedules.
//!
//! All schedule dates are plain calendar dates. "Today" is computed in the
//! business's declared timezone so that a late-evening request does not
//! roll experience anniversaries over early.

use crate::error::DomainError;
use chrono::{Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthRef {
    year: i32,
    month: u8,
}

impl MonthRef {
    /// Creates a validated month reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if `month` is not 1-12 or the year
    /// is outside the supported calendar range.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let valid_month: bool = Month::try_from(month).is_ok();
        let valid_year: bool = Date::from_calendar_date(year, Month::January, 1).is_ok()
            && Date::from_calendar_date(year, Month::December, 31).is_ok();

        if !valid_month || !valid_year {
            return Err(DomainError::InvalidMonth { year, month });
        }

        Ok(Self { year, month })
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn containing(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    fn time_month(self) -> Result<Month, DomainError> {
        Month::try_from(self.month).map_err(|_| DomainError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    /// Returns the number of days in this month, leap years included.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is out of range.
    pub fn days(self) -> Result<u8, DomainError> {
        Ok(time::util::days_in_year_month(self.year, self.time_month()?))
    }

    /// Returns the first day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be constructed.
    pub fn first_day(self) -> Result<Date, DomainError> {
        Date::from_calendar_date(self.year, self.time_month()?, 1).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("building first day of {self}: {e}"),
            }
        })
    }

    /// Returns the last day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be constructed.
    pub fn last_day(self) -> Result<Date, DomainError> {
        Date::from_calendar_date(self.year, self.time_month()?, self.days()?).map_err(|e| {
            DomainError::DateArithmeticOverflow {
                operation: format!("building last day of {self}: {e}"),
            }
        })
    }

    /// Returns every date of the month in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any date cannot be constructed.
    pub fn dates(self) -> Result<Vec<Date>, DomainError> {
        let month: Month = self.time_month()?;
        (1..=self.days()?)
            .map(|day| {
                Date::from_calendar_date(self.year, month, day).map_err(|e| {
                    DomainError::DateArithmeticOverflow {
                        operation: format!("building day {day} of {self}: {e}"),
                    }
                })
            })
            .collect()
    }

    /// Returns the previous month, wrapping to December of the prior year.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Returns the next month, wrapping to January of the following year.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for MonthRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Returns the local calendar date in `tz` at the given UTC instant.
///
/// # Errors
///
/// Returns an error if the chrono date cannot be represented as a `time::Date`.
pub fn local_date_at(tz: Tz, utc: chrono::DateTime<Utc>) -> Result<Date, DomainError> {
    let local = tz.from_utc_datetime(&utc.naive_utc());
    let month: u8 = u8::try_from(local.month()).map_err(|_| {
        DomainError::DateArithmeticOverflow {
            operation: String::from("converting local month"),
        }
    })?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting local day"),
    })?;

    let month: Month = Month::try_from(month).map_err(|e| DomainError::DateParseError {
        date_string: local.to_rfc3339(),
        error: e.to_string(),
    })?;

    Date::from_calendar_date(local.year(), month, day).map_err(|e| DomainError::DateParseError {
        date_string: local.to_rfc3339(),
        error: e.to_string(),
    })
}

/// Returns today's calendar date in `tz`.
///
/// # Errors
///
/// Returns an error if the date cannot be converted.
pub fn today_in(tz: Tz) -> Result<Date, DomainError> {
    local_date_at(tz, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_month_lengths_respect_leap_years() {
        assert_eq!(MonthRef::new(2024, 2).unwrap().days().unwrap(), 29);
        assert_eq!(MonthRef::new(2023, 2).unwrap().days().unwrap(), 28);
        assert_eq!(MonthRef::new(1900, 2).unwrap().days().unwrap(), 28);
        assert_eq!(MonthRef::new(2000, 2).unwrap().days().unwrap(), 29);
        assert_eq!(MonthRef::new(2024, 4).unwrap().dates().unwrap().len(), 30);
    }

    #[test]
    fn test_dates_cover_whole_month_in_order() {
        let dates = MonthRef::new(2024, 3).unwrap().dates().unwrap();

        assert_eq!(dates.len(), 31);
        assert_eq!(dates.first(), Some(&date!(2024 - 03 - 01)));
        assert_eq!(dates.last(), Some(&date!(2024 - 03 - 31)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_navigation_wraps_year_boundaries() {
        let january = MonthRef::new(2024, 1).unwrap();
        let december = MonthRef::new(2024, 12).unwrap();

        assert_eq!(january.previous(), MonthRef::new(2023, 12).unwrap());
        assert_eq!(december.next(), MonthRef::new(2025, 1).unwrap());
        assert_eq!(january.next(), MonthRef::new(2024, 2).unwrap());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            MonthRef::new(2024, 13),
            Err(DomainError::InvalidMonth { month: 13, .. })
        ));
        assert!(MonthRef::new(2024, 0).is_err());
    }

    #[test]
    fn test_local_date_follows_timezone() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();

        let new_york = parse_timezone("America/New_York").unwrap();
        let tokyo = parse_timezone("Asia/Tokyo").unwrap();

        assert_eq!(local_date_at(new_york, utc).unwrap(), date!(2024 - 03 - 09));
        assert_eq!(local_date_at(tokyo, utc).unwrap(), date!(2024 - 03 - 10));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(DomainError::InvalidTimezone(_))
        ));
    }
}
