// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker mutations.

use std::fmt::Write as _;

use brew_roster_domain::Worker;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::columns::format_optional_date;
use crate::crypto::ContactCipher;
use crate::diesel_schema::workers;
use crate::error::PersistenceError;

fn seal_contact(
    cipher: &ContactCipher,
    contact: Option<&str>,
) -> Result<Option<Vec<u8>>, PersistenceError> {
    contact
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| cipher.seal(c))
        .transpose()
}

backend_fn! {
/// Inserts a worker and returns its ID.
///
/// # Errors
///
/// Returns an error if encryption or the insert fails.
pub fn create_worker(
    conn: &mut _,
    cipher: &ContactCipher,
    worker: &Worker,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(workers::table)
        .values((
            workers::name.eq(worker.name.trim()),
            workers::contact.eq(seal_contact(cipher, worker.contact.as_deref())?),
            workers::experience_start.eq(format_optional_date(worker.experience_start)?),
            workers::experience_years.eq(i32::from(worker.experience_years)),
            workers::home_shop_id.eq(worker.home_shop_id),
            workers::fired_at.eq(format_optional_date(worker.fired_at)?),
            workers::vacation_start.eq(format_optional_date(worker.vacation_start)?),
            workers::identity_id.eq(worker.identity_id),
        ))
        .execute(conn)?;

    let worker_id: i64 = conn.get_last_insert_rowid()?;
    info!(worker_id, home_shop_id = ?worker.home_shop_id, "Created worker");
    Ok(worker_id)
}
}

backend_fn! {
/// Overwrites every stored field of an existing worker.
///
/// # Errors
///
/// Returns `PersistenceError::WorkerNotFound` if the worker does not exist.
pub fn update_worker(
    conn: &mut _,
    cipher: &ContactCipher,
    worker: &Worker,
) -> Result<(), PersistenceError> {
    let worker_id: i64 = worker
        .worker_id()
        .ok_or_else(|| PersistenceError::Other(String::from("Cannot update an unsaved worker")))?;

    let rows_affected: usize = diesel::update(workers::table)
        .filter(workers::worker_id.eq(worker_id))
        .set((
            workers::name.eq(worker.name.trim()),
            workers::contact.eq(seal_contact(cipher, worker.contact.as_deref())?),
            workers::experience_start.eq(format_optional_date(worker.experience_start)?),
            workers::experience_years.eq(i32::from(worker.experience_years)),
            workers::home_shop_id.eq(worker.home_shop_id),
            workers::fired_at.eq(format_optional_date(worker.fired_at)?),
            workers::vacation_start.eq(format_optional_date(worker.vacation_start)?),
            workers::identity_id.eq(worker.identity_id),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::WorkerNotFound(worker_id));
    }

    debug!(worker_id, "Updated worker");
    Ok(())
}
}

/// Builds the single bulk statement that writes reconciled experience years.
///
/// Only integers are interpolated, so the statement carries no user text.
fn experience_update_sql(changes: &[(i64, u16)]) -> String {
    let mut sql: String = String::from("UPDATE workers SET experience_years = CASE worker_id");
    for (worker_id, years) in changes {
        let _ = write!(sql, " WHEN {worker_id} THEN {years}");
    }
    sql.push_str(" ELSE experience_years END WHERE worker_id IN (");
    for (index, (worker_id, _)) in changes.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        let _ = write!(sql, "{worker_id}");
    }
    sql.push(')');
    sql
}

backend_fn! {
/// Writes reconciled experience years for many workers in one statement.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_experience_years(
    conn: &mut _,
    changes: &[(i64, u16)],
) -> Result<usize, PersistenceError> {
    if changes.is_empty() {
        return Ok(0);
    }

    let rows_affected: usize = diesel::sql_query(experience_update_sql(changes)).execute(conn)?;
    info!(rows_affected, "Resynchronized experience years");
    Ok(rows_affected)
}
}
