// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift-exchange request mutations.
//!
//! Every status change is a check-and-set `UPDATE ... WHERE status = 'pending'`.
//! Approvals also pin `taken_by` to the claimant they were planned for. A
//! write that matches no row lost a race and surfaces as `StaleWrite`.

use brew_roster::{ExchangeTransition, ShiftReassignment};
use brew_roster_domain::{RequestStatus, ShiftRequest};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::columns::format_timestamp;
use crate::diesel_schema::{shift_requests, shifts};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new pending request and returns its ID.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the shift already has a
/// pending request.
pub fn insert_shift_request(
    conn: &mut _,
    request: &ShiftRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(shift_requests::table)
        .values((
            shift_requests::shift_id.eq(request.shift_id),
            shift_requests::offered_by.eq(request.offered_by),
            shift_requests::reason.eq(&request.reason),
            shift_requests::status.eq(request.status.as_str()),
            shift_requests::requested_at.eq(format_timestamp(request.requested_at)?),
        ))
        .execute(conn)?;

    let request_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        request_id,
        shift_id = request.shift_id,
        offered_by = request.offered_by,
        "Shift offered"
    );
    Ok(request_id)
}
}

backend_fn! {
/// Writes a planned exchange transition.
///
/// The request update and any shift reassignment commit together or not at
/// all.
///
/// # Errors
///
/// Returns `PersistenceError::StaleWrite` if the request is no longer
/// pending, was claimed by someone else since it was read, or the shift
/// changed hands, and
/// `PersistenceError::UniqueViolation` if the claimant gained a shift on
/// that day in the meantime.
pub fn apply_exchange_transition(
    conn: &mut _,
    transition: &ExchangeTransition,
) -> Result<(), PersistenceError> {
    let request: &ShiftRequest = &transition.request;
    let request_id: i64 = request
        .request_id()
        .ok_or_else(|| PersistenceError::Other(String::from("Cannot update an unsaved request")))?;

    let taken_at: Option<String> = request.taken_at.map(format_timestamp).transpose()?;
    let approved_at: Option<String> = request.approved_at.map(format_timestamp).transpose()?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let pending = shift_requests::table
            .filter(shift_requests::request_id.eq(request_id))
            .filter(shift_requests::status.eq(RequestStatus::Pending.as_str()));
        let changes = (
            shift_requests::status.eq(request.status.as_str()),
            shift_requests::taken_by.eq(request.taken_by),
            shift_requests::taken_at.eq(&taken_at),
            shift_requests::approved_by.eq(request.approved_by),
            shift_requests::approved_at.eq(&approved_at),
        );

        // A reassignment is only valid for the claimant it was planned for.
        let rows_affected: usize = match &transition.reassignment {
            Some(reassignment) => diesel::update(
                pending.filter(shift_requests::taken_by.eq(reassignment.to_worker_id)),
            )
            .set(changes)
            .execute(conn)?,
            None => diesel::update(pending).set(changes).execute(conn)?,
        };

        if rows_affected == 0 {
            return Err(PersistenceError::StaleWrite {
                entity: "shift_request",
                id: request_id,
            });
        }

        if let Some(reassignment) = &transition.reassignment {
            let ShiftReassignment {
                shift_id,
                from_worker_id,
                to_worker_id,
            } = *reassignment;

            let rows_affected: usize = diesel::update(shifts::table)
                .filter(shifts::shift_id.eq(shift_id))
                .filter(shifts::worker_id.eq(from_worker_id))
                .set((
                    shifts::worker_id.eq(to_worker_id),
                    shifts::replacement_worker_id.eq(Some(from_worker_id)),
                ))
                .execute(conn)?;

            if rows_affected == 0 {
                return Err(PersistenceError::StaleWrite {
                    entity: "shift",
                    id: shift_id,
                });
            }

            info!(shift_id, from_worker_id, to_worker_id, "Shift reassigned");
        }

        info!(request_id, status = request.status.as_str(), "Shift request updated");
        Ok(())
    })
}
}
