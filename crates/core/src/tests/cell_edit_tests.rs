// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    CENTRAL, HARBOR, create_test_shops, create_test_worker, shop_admin_of, worker_scope,
};
use crate::{CellEditOutcome, CellEditPlan, CoreError, ShiftMutation, plan_cell_edit};
use brew_roster_domain::{CellParser, DomainError, Scope, ShiftKind};
use time::Date;
use time::macros::{date, time};

const DAY: Date = date!(2024 - 03 - 05);

#[test]
fn test_timed_edit_plans_upsert() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let plan: CellEditPlan = plan_cell_edit(
        &shop_admin_of(&[CENTRAL]),
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "9.30",
    )
    .unwrap();

    assert_eq!(plan.worker_id, 10);
    assert_eq!(plan.kind_name(), "timed");
    assert_eq!(
        plan.mutation,
        ShiftMutation::Upsert(ShiftKind::Timed {
            start: time!(9:30)
        })
    );
}

#[test]
fn test_off_word_plans_clear() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let plan = plan_cell_edit(
        &Scope::SuperAdmin,
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "off",
    )
    .unwrap();

    assert_eq!(plan.mutation, ShiftMutation::Clear);
    assert_eq!(plan.kind_name(), "cleared");
}

#[test]
fn test_loan_to_other_shop() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let plan = plan_cell_edit(
        &Scope::SuperAdmin,
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "HRB",
    )
    .unwrap();

    assert_eq!(
        plan.mutation,
        ShiftMutation::Upsert(ShiftKind::Loaned { shop_id: HARBOR })
    );
}

#[test]
fn test_loan_to_home_shop_is_invalid() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let result = plan_cell_edit(
        &Scope::SuperAdmin,
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "CEN",
    );

    assert!(matches!(result, Err(CoreError::InvalidOperation { .. })));
}

#[test]
fn test_worker_scope_cannot_edit() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let result = plan_cell_edit(
        &worker_scope(10),
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "+",
    );

    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_admin_of_other_shop_is_forbidden() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let result = plan_cell_edit(
        &shop_admin_of(&[HARBOR]),
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "+",
    );

    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_cannot_edit_worker_of_another_roster() {
    let worker = create_test_worker(10, "Ana", Some(HARBOR));

    let result = plan_cell_edit(
        &shop_admin_of(&[CENTRAL, HARBOR]),
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "+",
    );

    assert!(matches!(
        result,
        Err(CoreError::Forbidden { reason, .. }) if reason == "cannot edit another shop's roster"
    ));
}

#[test]
fn test_unknown_shop_is_not_found() {
    let worker = create_test_worker(10, "Ana", Some(99));

    let result = plan_cell_edit(
        &Scope::SuperAdmin,
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        99,
        DAY,
        "+",
    );

    assert!(matches!(result, Err(CoreError::NotFound { .. })));
}

#[test]
fn test_parse_errors_surface_as_domain_violations() {
    let worker = create_test_worker(10, "Ana", Some(CENTRAL));

    let result = plan_cell_edit(
        &Scope::SuperAdmin,
        &CellParser::default(),
        &create_test_shops(),
        &worker,
        CENTRAL,
        DAY,
        "ABC",
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::UnknownToken { .. }))
    ));
}

#[test]
fn test_outcome_classification() {
    let overtime = ShiftKind::Overtime;
    let timed = ShiftKind::Timed {
        start: time!(8:00),
    };

    assert_eq!(
        CellEditOutcome::classify(None, &ShiftMutation::Clear),
        CellEditOutcome::Unchanged
    );
    assert_eq!(
        CellEditOutcome::classify(Some(&overtime), &ShiftMutation::Clear),
        CellEditOutcome::Deleted
    );
    assert_eq!(
        CellEditOutcome::classify(None, &ShiftMutation::Upsert(overtime)),
        CellEditOutcome::Created
    );
    assert_eq!(
        CellEditOutcome::classify(Some(&overtime), &ShiftMutation::Upsert(overtime)),
        CellEditOutcome::Unchanged
    );
    assert_eq!(
        CellEditOutcome::classify(Some(&overtime), &ShiftMutation::Upsert(timed)),
        CellEditOutcome::Updated
    );
}
