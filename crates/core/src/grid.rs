// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly schedule grid construction.
//!
//! The grid for a shop shows its active home roster plus every worker loaned
//! in from another shop during the month. Coverage counts a shift for the
//! shop it is loaned to, or for its owning shop when it is not a loan.

use crate::error::CoreError;
use brew_roster_domain::{MonthRef, Shift, Shop, Worker};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// Everything the grid builder reads, loaded by the caller.
#[derive(Debug, Clone)]
pub struct GridInput {
    /// The shop whose schedule is shown.
    pub shop: Shop,
    /// The month shown.
    pub month: MonthRef,
    /// Workers whose home shop is `shop`, including terminated ones.
    pub home_workers: Vec<Worker>,
    /// Workers from other shops appearing in `loaned_in_shifts`.
    pub loaned_in_workers: Vec<Worker>,
    /// Shifts owned by `shop` in the month.
    pub owned_shifts: Vec<Shift>,
    /// Shifts owned by other shops in the month and loaned to `shop`.
    pub loaned_in_shifts: Vec<Shift>,
    /// All shops, for navigation and short-code display.
    pub shops: Vec<Shop>,
}

/// One worker's row in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// The worker.
    pub worker: Worker,
    /// Whether the worker is here on loan from another shop.
    pub loaned_in: bool,
    /// One cell per day of the month; `None` is a day off.
    pub cells: Vec<Option<Shift>>,
}

/// Per-day staffing summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCoverage {
    /// The day.
    pub date: Date,
    /// Shifts counting toward the shop that day.
    pub coverage: u32,
    /// Whether coverage is below the shop's staffing target.
    pub understaffed: bool,
}

/// A shop's schedule for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    /// The shop shown.
    pub shop: Shop,
    /// The month shown.
    pub month: MonthRef,
    /// Navigation to the previous month.
    pub previous: MonthRef,
    /// Navigation to the next month.
    pub next: MonthRef,
    /// Every date of the month, in order.
    pub dates: Vec<Date>,
    /// Worker rows: home roster first, then loaned-in workers.
    pub rows: Vec<GridRow>,
    /// Coverage per date, parallel to `dates`.
    pub days: Vec<DayCoverage>,
    /// All shops.
    pub shops: Vec<Shop>,
}

/// Builds the monthly grid for one shop.
///
/// # Errors
///
/// Returns an error if the shop has not been persisted or the month's dates
/// cannot be computed.
pub fn build_grid(input: GridInput) -> Result<ScheduleGrid, CoreError> {
    let GridInput {
        shop,
        month,
        home_workers,
        loaned_in_workers,
        owned_shifts,
        loaned_in_shifts,
        shops,
    } = input;

    let shop_id: i64 = shop
        .shop_id()
        .ok_or_else(|| CoreError::invalid("shop has not been saved"))?;
    let dates: Vec<Date> = month.dates()?;
    let first_day: Date = month.first_day()?;
    let last_day: Date = month.last_day()?;

    let mut home_roster: Vec<Worker> = home_workers
        .into_iter()
        .filter(|worker| worker.home_shop_id == Some(shop_id))
        .filter(|worker| worker.is_on_roster_for(first_day))
        .collect();
    sort_by_name(&mut home_roster);

    let on_roster: BTreeSet<i64> = home_roster.iter().filter_map(Worker::worker_id).collect();

    let loaned_in_ids: BTreeSet<i64> = loaned_in_shifts
        .iter()
        .filter(|shift| shift.shop_id != shop_id)
        .map(|shift| shift.worker_id)
        .collect();

    let mut visitors: Vec<Worker> = loaned_in_workers
        .into_iter()
        .filter(|worker| {
            worker
                .worker_id()
                .is_some_and(|id| loaned_in_ids.contains(&id) && !on_roster.contains(&id))
        })
        .collect();
    sort_by_name(&mut visitors);
    visitors.dedup_by_key(|worker| worker.worker_id());

    let shifts: Vec<Shift> = owned_shifts
        .into_iter()
        .filter(|shift| shift.shop_id == shop_id)
        .chain(
            loaned_in_shifts
                .into_iter()
                .filter(|shift| shift.shop_id != shop_id && shift.kind.loaned_to() == Some(shop_id)),
        )
        .filter(|shift| (first_day..=last_day).contains(&shift.date))
        .collect();

    let mut by_cell: BTreeMap<(i64, Date), Shift> = BTreeMap::new();
    for shift in &shifts {
        by_cell.insert((shift.worker_id, shift.date), shift.clone());
    }

    let rows: Vec<GridRow> = home_roster
        .into_iter()
        .map(|worker| (worker, false))
        .chain(visitors.into_iter().map(|worker| (worker, true)))
        .map(|(worker, loaned_in)| {
            let cells: Vec<Option<Shift>> = worker.worker_id().map_or_else(
                || vec![None; dates.len()],
                |worker_id| {
                    dates
                        .iter()
                        .map(|date| by_cell.get(&(worker_id, *date)).cloned())
                        .collect()
                },
            );
            GridRow {
                worker,
                loaned_in,
                cells,
            }
        })
        .collect();

    let days: Vec<DayCoverage> = dates
        .iter()
        .map(|date| {
            let count: usize = shifts
                .iter()
                .filter(|shift| shift.date == *date && shift.counts_toward(shop_id))
                .count();
            let coverage: u32 = u32::try_from(count).unwrap_or(u32::MAX);
            DayCoverage {
                date: *date,
                coverage,
                understaffed: coverage < shop.minimum_workers,
            }
        })
        .collect();

    Ok(ScheduleGrid {
        previous: month.previous(),
        next: month.next(),
        shop,
        month,
        dates,
        rows,
        days,
        shops,
    })
}

fn sort_by_name(workers: &mut [Worker]) {
    workers.sort_by(|a, b| a.name.cmp(&b.name).then(a.worker_id().cmp(&b.worker_id())));
}
