// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Experience-years computation.
//!
//! The cached `experience_years` on a worker drifts as the calendar moves.
//! Read paths recompute it against "today", collect the mismatches, and let
//! storage write them back in one statement.

use crate::types::Worker;
use time::Date;

/// Computes whole years of experience from `start` as of `as_of`.
///
/// Returns zero when there is no start date or the start date is in the
/// future. The count increments on the anniversary day itself.
#[must_use]
pub fn compute_experience_years(start: Option<Date>, as_of: Date) -> u16 {
    let Some(start) = start else {
        return 0;
    };

    if as_of < start {
        return 0;
    }

    let years_diff: i32 = as_of.year() - start.year();

    let anniversary_reached: bool = (as_of.month() > start.month())
        || (as_of.month() == start.month() && as_of.day() >= start.day());

    let years: i32 = if anniversary_reached {
        years_diff
    } else {
        years_diff - 1
    };

    u16::try_from(years.max(0)).unwrap_or(u16::MAX)
}

/// Brings every worker's cached years up to date as of `as_of`.
///
/// Mutates the in-memory workers and returns only the `(worker_id, years)`
/// pairs that changed, for a single bulk write. Workers without an ID are
/// updated in memory but never reported.
pub fn reconcile_experience(workers: &mut [Worker], as_of: Date) -> Vec<(i64, u16)> {
    let mut changed: Vec<(i64, u16)> = Vec::new();

    for worker in workers.iter_mut() {
        let years: u16 = compute_experience_years(worker.experience_start, as_of);
        if worker.experience_years == years {
            continue;
        }

        worker.experience_years = years;
        if let Some(worker_id) = worker.worker_id() {
            changed.push((worker_id, years));
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_anniversary_day_increments() {
        let start = Some(date!(2020 - 03 - 10));

        assert_eq!(compute_experience_years(start, date!(2024 - 03 - 09)), 3);
        assert_eq!(compute_experience_years(start, date!(2024 - 03 - 10)), 4);
    }

    #[test]
    fn test_missing_or_future_start_is_zero() {
        assert_eq!(compute_experience_years(None, date!(2024 - 03 - 10)), 0);
        assert_eq!(
            compute_experience_years(Some(date!(2025 - 01 - 01)), date!(2024 - 03 - 10)),
            0
        );
    }

    #[test]
    fn test_first_partial_year_is_zero() {
        assert_eq!(
            compute_experience_years(Some(date!(2023 - 12 - 31)), date!(2024 - 01 - 01)),
            0
        );
    }

    #[test]
    fn test_leap_day_start() {
        let start = Some(date!(2020 - 02 - 29));

        assert_eq!(compute_experience_years(start, date!(2021 - 02 - 28)), 0);
        assert_eq!(compute_experience_years(start, date!(2021 - 03 - 01)), 1);
        assert_eq!(compute_experience_years(start, date!(2024 - 02 - 29)), 4);
    }

    #[test]
    fn test_reconcile_reports_only_mismatches() {
        let mut current = Worker::new(String::from("Ana"), Some(date!(2020 - 03 - 10))).with_id(1);
        current.experience_years = 4;
        let mut stale = Worker::new(String::from("Bo"), Some(date!(2018 - 01 - 01))).with_id(2);
        stale.experience_years = 1;
        let unsaved = Worker::new(String::from("Cy"), Some(date!(2010 - 01 - 01)));

        let mut workers = vec![current, stale, unsaved];
        let changed = reconcile_experience(&mut workers, date!(2024 - 03 - 10));

        assert_eq!(changed, vec![(2, 6)]);
        assert_eq!(workers[0].experience_years, 4);
        assert_eq!(workers[1].experience_years, 6);
        assert_eq!(workers[2].experience_years, 14);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut workers =
            vec![Worker::new(String::from("Ana"), Some(date!(2015 - 06 - 01))).with_id(9)];

        let first = reconcile_experience(&mut workers, date!(2024 - 03 - 10));
        let second = reconcile_experience(&mut workers, date!(2024 - 03 - 10));

        assert_eq!(first, vec![(9, 8)]);
        assert!(second.is_empty());
    }
}
