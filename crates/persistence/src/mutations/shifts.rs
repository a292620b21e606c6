// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift mutations.

use brew_roster::{CellEditOutcome, CellEditPlan, ShiftMutation};
use brew_roster_domain::ShiftKind;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::columns::{format_date, format_time, parse_time};
use crate::diesel_schema::{shift_requests, shifts};
use crate::error::PersistenceError;

/// Storage columns for a shift kind: `(start_time, is_overtime, another_shop_id)`.
fn kind_columns(kind: &ShiftKind) -> Result<(Option<String>, i32, Option<i64>), PersistenceError> {
    let (start, is_overtime, another_shop_id) = kind.to_columns();
    Ok((
        start.map(format_time).transpose()?,
        i32::from(is_overtime),
        another_shop_id,
    ))
}

backend_fn! {
/// Applies a planned cell edit as an idempotent write on the `(worker, date)` row.
///
/// Runs in one transaction: the current row is read, the outcome classified,
/// and only then is the row inserted, overwritten or deleted. Clearing a
/// shift also removes its exchange requests.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if a concurrent writer
/// inserted the same `(worker, date)` row first.
pub fn apply_shift_mutation(
    conn: &mut _,
    plan: &CellEditPlan,
) -> Result<CellEditOutcome, PersistenceError> {
    let date_text: String = format_date(plan.date)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let existing: Option<(i64, i64, Option<String>, i32, Option<i64>)> = shifts::table
            .filter(shifts::worker_id.eq(plan.worker_id))
            .filter(shifts::date.eq(&date_text))
            .select((
                shifts::shift_id,
                shifts::shop_id,
                shifts::start_time,
                shifts::is_overtime,
                shifts::another_shop_id,
            ))
            .first(conn)
            .optional()?;

        let existing_kind: Option<ShiftKind> = existing
            .as_ref()
            .map(|(_, _, start, overtime, loan)| {
                let start = start.as_deref().map(parse_time).transpose()?;
                Ok::<_, PersistenceError>(ShiftKind::from_columns(start, *overtime != 0, *loan)?)
            })
            .transpose()?;

        let mut outcome: CellEditOutcome =
            CellEditOutcome::classify(existing_kind.as_ref(), &plan.mutation);

        // A row left behind by a previous home shop moves with the edit.
        if outcome == CellEditOutcome::Unchanged
            && matches!(plan.mutation, ShiftMutation::Upsert(_))
            && existing.as_ref().is_some_and(|row| row.1 != plan.shop_id)
        {
            outcome = CellEditOutcome::Updated;
        }

        match (&plan.mutation, existing) {
            (ShiftMutation::Clear, Some((shift_id, ..))) => {
                diesel::delete(shift_requests::table)
                    .filter(shift_requests::shift_id.eq(shift_id))
                    .execute(conn)?;
                diesel::delete(shifts::table)
                    .filter(shifts::shift_id.eq(shift_id))
                    .execute(conn)?;
            }
            (ShiftMutation::Upsert(kind), Some((shift_id, ..)))
                if outcome == CellEditOutcome::Updated =>
            {
                let (start_time, is_overtime, another_shop_id) = kind_columns(kind)?;
                diesel::update(shifts::table)
                    .filter(shifts::shift_id.eq(shift_id))
                    .set((
                        shifts::shop_id.eq(plan.shop_id),
                        shifts::start_time.eq(start_time),
                        shifts::is_overtime.eq(is_overtime),
                        shifts::another_shop_id.eq(another_shop_id),
                    ))
                    .execute(conn)?;
            }
            (ShiftMutation::Upsert(kind), None) => {
                let (start_time, is_overtime, another_shop_id) = kind_columns(kind)?;
                diesel::insert_into(shifts::table)
                    .values((
                        shifts::worker_id.eq(plan.worker_id),
                        shifts::shop_id.eq(plan.shop_id),
                        shifts::date.eq(&date_text),
                        shifts::start_time.eq(start_time),
                        shifts::is_overtime.eq(is_overtime),
                        shifts::another_shop_id.eq(another_shop_id),
                    ))
                    .execute(conn)?;
            }
            (ShiftMutation::Clear, None) | (ShiftMutation::Upsert(_), Some(_)) => {
                debug!(worker_id = plan.worker_id, date = %date_text, "Cell already up to date");
            }
        }

        info!(
            worker_id = plan.worker_id,
            shop_id = plan.shop_id,
            date = %date_text,
            kind = plan.kind_name(),
            outcome = outcome.as_str(),
            "Applied cell edit"
        );

        Ok(outcome)
    })
}
}
