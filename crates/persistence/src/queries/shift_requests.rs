// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift-exchange request queries.

use brew_roster_domain::{RequestStatus, ShiftRequest};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::columns::{parse_optional_timestamp, parse_timestamp};
use crate::diesel_schema::{shift_requests, shifts};
use crate::error::PersistenceError;

/// Diesel Queryable struct for request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shift_requests)]
pub(crate) struct ShiftRequestRow {
    request_id: i64,
    shift_id: i64,
    offered_by: i64,
    reason: String,
    status: String,
    requested_at: String,
    taken_by: Option<i64>,
    taken_at: Option<String>,
    approved_by: Option<i64>,
    approved_at: Option<String>,
}

impl TryFrom<ShiftRequestRow> for ShiftRequest {
    type Error = PersistenceError;

    fn try_from(row: ShiftRequestRow) -> Result<Self, Self::Error> {
        let mut request: Self = Self::new(
            row.shift_id,
            row.offered_by,
            row.reason,
            parse_timestamp(&row.requested_at)?,
        )
        .with_id(row.request_id);

        request.status = row.status.parse::<RequestStatus>()?;
        request.taken_by = row.taken_by;
        request.taken_at = parse_optional_timestamp(row.taken_at.as_deref())?;
        request.approved_by = row.approved_by;
        request.approved_at = parse_optional_timestamp(row.approved_at.as_deref())?;

        Ok(request)
    }
}

fn rows_into_requests(rows: Vec<ShiftRequestRow>) -> Result<Vec<ShiftRequest>, PersistenceError> {
    rows.into_iter().map(ShiftRequest::try_from).collect()
}

backend_fn! {
/// Retrieves a request by ID.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` if no such request exists.
pub fn get_shift_request(conn: &mut _, request_id: i64) -> Result<ShiftRequest, PersistenceError> {
    shift_requests::table
        .filter(shift_requests::request_id.eq(request_id))
        .select(ShiftRequestRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::RequestNotFound(request_id))?
        .try_into()
}
}

backend_fn! {
/// Returns whether the shift already has an open request.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn has_pending_request(conn: &mut _, shift_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = shift_requests::table
        .filter(shift_requests::shift_id.eq(shift_id))
        .filter(shift_requests::status.eq(RequestStatus::Pending.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Lists requests for shifts owned by `shop_id`, newest first, optionally
/// restricted to one status.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_requests_for_shop(
    conn: &mut _,
    shop_id: i64,
    status: Option<RequestStatus>,
) -> Result<Vec<ShiftRequest>, PersistenceError> {
    let mut query = shift_requests::table
        .inner_join(shifts::table)
        .filter(shifts::shop_id.eq(shop_id))
        .select(ShiftRequestRow::as_select())
        .order((
            shift_requests::requested_at.desc(),
            shift_requests::request_id.desc(),
        ))
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(shift_requests::status.eq(status.as_str()));
    }

    rows_into_requests(query.load(conn)?)
}
}

backend_fn! {
/// Lists requests a worker has offered plus open requests by others on
/// shifts of the worker's home shop.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_requests_for_worker(
    conn: &mut _,
    worker_id: i64,
    home_shop_id: Option<i64>,
) -> Result<Vec<ShiftRequest>, PersistenceError> {
    let offered = shift_requests::offered_by.eq(worker_id);
    let query = shift_requests::table
        .inner_join(shifts::table)
        .select(ShiftRequestRow::as_select())
        .order((
            shift_requests::requested_at.desc(),
            shift_requests::request_id.desc(),
        ))
        .into_boxed();

    let rows: Vec<ShiftRequestRow> = match home_shop_id {
        Some(shop_id) => query
            .filter(
                offered.or(shift_requests::offered_by
                    .ne(worker_id)
                    .and(shift_requests::status.eq(RequestStatus::Pending.as_str()))
                    .and(shifts::shop_id.eq(shop_id))),
            )
            .load(conn)?,
        None => query.filter(offered).load(conn)?,
    };

    rows_into_requests(rows)
}
}
