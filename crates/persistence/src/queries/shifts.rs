// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift queries.
//!
//! Dates are stored as `YYYY-MM-DD` text, so month ranges are plain string
//! comparisons on the `(shop_id, date)` and `(another_shop_id, date)` indexes.

use brew_roster_domain::{Shift, ShiftKind};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::Date;

use crate::columns::{format_date, parse_date, parse_time};
use crate::diesel_schema::shifts;
use crate::error::PersistenceError;

/// Diesel Queryable struct for shift rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
pub(crate) struct ShiftRow {
    shift_id: i64,
    worker_id: i64,
    shop_id: i64,
    date: String,
    start_time: Option<String>,
    is_overtime: i32,
    another_shop_id: Option<i64>,
    replacement_worker_id: Option<i64>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = PersistenceError;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let start = row.start_time.as_deref().map(parse_time).transpose()?;
        let kind: ShiftKind =
            ShiftKind::from_columns(start, row.is_overtime != 0, row.another_shop_id)?;

        let date: Date = parse_date(&row.date)?;
        let mut shift: Self =
            Self::new(row.worker_id, row.shop_id, date, kind).with_id(row.shift_id);
        shift.replacement_worker_id = row.replacement_worker_id;
        Ok(shift)
    }
}

fn rows_into_shifts(rows: Vec<ShiftRow>) -> Result<Vec<Shift>, PersistenceError> {
    rows.into_iter().map(Shift::try_from).collect()
}

backend_fn! {
/// Retrieves a shift by ID.
///
/// # Errors
///
/// Returns `PersistenceError::ShiftNotFound` if no such shift exists.
pub fn get_shift(conn: &mut _, shift_id: i64) -> Result<Shift, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ShiftNotFound(shift_id))?
        .try_into()
}
}

backend_fn! {
/// Retrieves a worker's shift on a given day, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_shift_for_worker_on(
    conn: &mut _,
    worker_id: i64,
    date: Date,
) -> Result<Option<Shift>, PersistenceError> {
    let date_text: String = format_date(date)?;

    shifts::table
        .filter(shifts::worker_id.eq(worker_id))
        .filter(shifts::date.eq(&date_text))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(Shift::try_from)
        .transpose()
}
}

backend_fn! {
/// Lists shifts owned by `shop_id` between `from` and `to` inclusive,
/// loaned-out shifts included.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_owned_shifts(
    conn: &mut _,
    shop_id: i64,
    from: Date,
    to: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::shop_id.eq(shop_id))
        .filter(shifts::date.ge(format_date(from)?))
        .filter(shifts::date.le(format_date(to)?))
        .order((shifts::date.asc(), shifts::worker_id.asc()))
        .select(ShiftRow::as_select())
        .load(conn)?;

    rows_into_shifts(rows)
}
}

backend_fn! {
/// Lists shifts other shops have loaned into `shop_id` between `from` and
/// `to` inclusive.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_loaned_in_shifts(
    conn: &mut _,
    shop_id: i64,
    from: Date,
    to: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::another_shop_id.eq(shop_id))
        .filter(shifts::shop_id.ne(shop_id))
        .filter(shifts::date.ge(format_date(from)?))
        .filter(shifts::date.le(format_date(to)?))
        .order((shifts::date.asc(), shifts::worker_id.asc()))
        .select(ShiftRow::as_select())
        .load(conn)?;

    rows_into_shifts(rows)
}
}
