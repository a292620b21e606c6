// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{CENTRAL, HARBOR, create_test_shops, create_test_worker};
use crate::{GridInput, ScheduleGrid, build_grid};
use brew_roster_domain::{MonthRef, Shift, ShiftKind, Shop, Worker};
use time::Date;
use time::macros::{date, time};

fn shop(shops: &[Shop], shop_id: i64) -> Shop {
    shops
        .iter()
        .find(|s| s.shop_id() == Some(shop_id))
        .cloned()
        .unwrap()
}

fn timed(shift_id: i64, worker_id: i64, shop_id: i64, date: Date) -> Shift {
    Shift::new(
        worker_id,
        shop_id,
        date,
        ShiftKind::Timed {
            start: time!(7:00),
        },
    )
    .with_id(shift_id)
}

fn loaned(shift_id: i64, worker_id: i64, from: i64, to: i64, date: Date) -> Shift {
    Shift::new(worker_id, from, date, ShiftKind::Loaned { shop_id: to }).with_id(shift_id)
}

fn input(shop_id: i64, month: MonthRef, home: Vec<Worker>) -> GridInput {
    let shops = create_test_shops();
    GridInput {
        shop: shop(&shops, shop_id),
        month,
        home_workers: home,
        loaned_in_workers: Vec::new(),
        owned_shifts: Vec::new(),
        loaned_in_shifts: Vec::new(),
        shops,
    }
}

#[test]
fn test_grid_has_every_day_of_month() {
    let grid: ScheduleGrid = build_grid(input(
        CENTRAL,
        MonthRef::new(2024, 2).unwrap(),
        vec![create_test_worker(1, "Ana", Some(CENTRAL))],
    ))
    .unwrap();

    assert_eq!(grid.dates.len(), 29);
    assert_eq!(grid.days.len(), 29);
    assert_eq!(grid.rows[0].cells.len(), 29);
    assert_eq!(grid.previous, MonthRef::new(2024, 1).unwrap());
    assert_eq!(grid.next, MonthRef::new(2024, 3).unwrap());
    assert_eq!(grid.shops.len(), 2);
}

#[test]
fn test_fired_workers_leave_roster_after_first_day() {
    let mut fired_before = create_test_worker(1, "Ana", Some(CENTRAL));
    fired_before.fired_at = Some(date!(2024 - 02 - 20));
    let mut fired_on_first = create_test_worker(2, "Bo", Some(CENTRAL));
    fired_on_first.fired_at = Some(date!(2024 - 03 - 01));
    let mut fired_mid_month = create_test_worker(3, "Cy", Some(CENTRAL));
    fired_mid_month.fired_at = Some(date!(2024 - 03 - 15));
    let active = create_test_worker(4, "Di", Some(CENTRAL));

    let grid = build_grid(input(
        CENTRAL,
        MonthRef::new(2024, 3).unwrap(),
        vec![fired_before, fired_on_first, fired_mid_month, active],
    ))
    .unwrap();

    let names: Vec<&str> = grid.rows.iter().map(|r| r.worker.name.as_str()).collect();
    assert_eq!(names, vec!["Cy", "Di"]);
}

#[test]
fn test_loan_moves_coverage_to_target_shop() {
    let month = MonthRef::new(2024, 3).unwrap();
    let day = date!(2024 - 03 - 05);
    let ana = create_test_worker(1, "Ana", Some(CENTRAL));
    let bo = create_test_worker(2, "Bo", Some(HARBOR));

    let mut central = input(CENTRAL, month, vec![ana.clone()]);
    central.owned_shifts = vec![loaned(10, 1, CENTRAL, HARBOR, day)];
    let central_grid = build_grid(central).unwrap();

    let mut harbor = input(HARBOR, month, vec![bo]);
    harbor.owned_shifts = vec![timed(11, 2, HARBOR, day)];
    harbor.loaned_in_workers = vec![ana];
    harbor.loaned_in_shifts = vec![loaned(10, 1, CENTRAL, HARBOR, day)];
    let harbor_grid = build_grid(harbor).unwrap();

    assert_eq!(central_grid.days[4].coverage, 0);
    assert!(central_grid.days[4].understaffed);
    assert!(central_grid.rows[0].cells[4].is_some());

    assert_eq!(harbor_grid.days[4].coverage, 2);
    assert!(!harbor_grid.days[4].understaffed);
    assert_eq!(harbor_grid.rows.len(), 2);
    assert!(harbor_grid.rows[1].loaned_in);
    assert_eq!(harbor_grid.rows[1].worker.name, "Ana");
    assert!(harbor_grid.rows[1].cells[4].is_some());
    assert!(harbor_grid.rows[1].cells[5].is_none());
}

#[test]
fn test_loaned_in_workers_ignore_termination() {
    let month = MonthRef::new(2024, 3).unwrap();
    let mut ana = create_test_worker(1, "Ana", Some(CENTRAL));
    ana.fired_at = Some(date!(2024 - 02 - 01));

    let mut harbor = input(HARBOR, month, Vec::new());
    harbor.loaned_in_workers = vec![ana];
    harbor.loaned_in_shifts = vec![loaned(10, 1, CENTRAL, HARBOR, date!(2024 - 03 - 02))];

    let grid = build_grid(harbor).unwrap();

    assert_eq!(grid.rows.len(), 1);
    assert_eq!(grid.days[1].coverage, 1);
}

#[test]
fn test_central_loan_scenario() {
    // Harbor worker loaned to Central with "CEN" on the 10th.
    let month = MonthRef::new(2024, 3).unwrap();
    let day = date!(2024 - 03 - 10);
    let central_staff: Vec<Worker> = (1..=3)
        .map(|id| create_test_worker(id, &format!("C{id}"), Some(CENTRAL)))
        .collect();
    let visitor = create_test_worker(9, "Visitor", Some(HARBOR));

    let mut central = input(CENTRAL, month, central_staff);
    central.owned_shifts = (1..=3).map(|id| timed(id, id, CENTRAL, day)).collect();
    central.loaned_in_workers = vec![visitor];
    central.loaned_in_shifts = vec![loaned(20, 9, HARBOR, CENTRAL, day)];

    let grid = build_grid(central).unwrap();

    assert_eq!(grid.rows.len(), 4);
    assert_eq!(grid.days[9].coverage, 4);
    assert!(!grid.days[9].understaffed);
    assert!(grid.days[8].understaffed);
}

#[test]
fn test_shifts_outside_month_are_ignored() {
    let month = MonthRef::new(2024, 3).unwrap();
    let ana = create_test_worker(1, "Ana", Some(CENTRAL));

    let mut central = input(CENTRAL, month, vec![ana]);
    central.owned_shifts = vec![timed(1, 1, CENTRAL, date!(2024 - 04 - 01))];

    let grid = build_grid(central).unwrap();

    assert!(grid.rows[0].cells.iter().all(Option::is_none));
    assert!(grid.days.iter().all(|d| d.coverage == 0));
}
