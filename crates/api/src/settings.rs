// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Runtime settings shared by all handlers.

use brew_roster_domain::{CellParser, local_date_at};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime};

use crate::error::{ApiError, translate_domain_error};

/// Business settings the handlers need besides storage.
#[derive(Debug, Clone)]
pub struct RosterSettings {
    /// Timezone in which "today" is evaluated.
    pub timezone: Tz,
    /// Parser for schedule-cell edits.
    pub cell_parser: CellParser,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            cell_parser: CellParser::default(),
        }
    }
}

impl RosterSettings {
    /// Creates settings for a timezone and a set of off-synonyms.
    #[must_use]
    pub fn new<I, S>(timezone: Tz, off_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            timezone,
            cell_parser: CellParser::new(off_words),
        }
    }

    /// Returns the business-local calendar date at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if `now` cannot be represented as a chrono instant.
    pub fn today(&self, now: OffsetDateTime) -> Result<Date, ApiError> {
        let utc: DateTime<Utc> = DateTime::from_timestamp(now.unix_timestamp(), 0)
            .ok_or_else(|| ApiError::Internal {
                message: format!("timestamp {now} is out of range"),
            })?;

        local_date_at(self.timezone, utc).map_err(translate_domain_error)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_today_follows_timezone() {
        let utc = RosterSettings::default();
        let tokyo = RosterSettings::new(Tz::Asia__Tokyo, ["off"]);
        let now = datetime!(2024-03-09 20:00 UTC);

        assert_eq!(utc.today(now).unwrap(), date!(2024 - 03 - 09));
        assert_eq!(tokyo.today(now).unwrap(), date!(2024 - 03 - 10));
    }
}
