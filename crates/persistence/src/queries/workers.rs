// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker queries.
//!
//! Contact details are decrypted on the way out; nothing above this layer
//! ever sees the sealed bytes.

use brew_roster_domain::Worker;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::columns::parse_optional_date;
use crate::crypto::ContactCipher;
use crate::diesel_schema::workers;
use crate::error::PersistenceError;

/// Diesel Queryable struct for worker rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = workers)]
pub(crate) struct WorkerRow {
    worker_id: i64,
    name: String,
    contact: Option<Vec<u8>>,
    experience_start: Option<String>,
    experience_years: i32,
    home_shop_id: Option<i64>,
    fired_at: Option<String>,
    vacation_start: Option<String>,
    identity_id: Option<i64>,
}

impl WorkerRow {
    pub(crate) fn into_worker(self, cipher: &ContactCipher) -> Result<Worker, PersistenceError> {
        let experience_years: u16 = self.experience_years.to_u16().ok_or_else(|| {
            PersistenceError::CorruptRow(format!(
                "worker {} has out-of-range experience_years {}",
                self.worker_id, self.experience_years
            ))
        })?;

        let mut worker: Worker = Worker::new(
            self.name,
            parse_optional_date(self.experience_start.as_deref())?,
        )
        .with_id(self.worker_id);

        worker.contact = self
            .contact
            .as_deref()
            .map(|sealed| cipher.open(sealed))
            .transpose()?;
        worker.experience_years = experience_years;
        worker.home_shop_id = self.home_shop_id;
        worker.fired_at = parse_optional_date(self.fired_at.as_deref())?;
        worker.vacation_start = parse_optional_date(self.vacation_start.as_deref())?;
        worker.identity_id = self.identity_id;

        Ok(worker)
    }
}

fn rows_into_workers(
    rows: Vec<WorkerRow>,
    cipher: &ContactCipher,
) -> Result<Vec<Worker>, PersistenceError> {
    rows.into_iter().map(|row| row.into_worker(cipher)).collect()
}

backend_fn! {
/// Retrieves a worker by ID.
///
/// # Errors
///
/// Returns `PersistenceError::WorkerNotFound` if no such worker exists.
pub fn get_worker(
    conn: &mut _,
    cipher: &ContactCipher,
    worker_id: i64,
) -> Result<Worker, PersistenceError> {
    debug!(worker_id, "Looking up worker");

    workers::table
        .filter(workers::worker_id.eq(worker_id))
        .select(WorkerRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::WorkerNotFound(worker_id))?
        .into_worker(cipher)
}
}

backend_fn! {
/// Retrieves the worker linked to a login identity, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn get_worker_by_identity(
    conn: &mut _,
    cipher: &ContactCipher,
    identity_id: i64,
) -> Result<Option<Worker>, PersistenceError> {
    workers::table
        .filter(workers::identity_id.eq(identity_id))
        .select(WorkerRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| row.into_worker(cipher))
        .transpose()
}
}

backend_fn! {
/// Lists every worker whose home shop is `shop_id`, fired workers included.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_workers_for_shop(
    conn: &mut _,
    cipher: &ContactCipher,
    shop_id: i64,
) -> Result<Vec<Worker>, PersistenceError> {
    let rows: Vec<WorkerRow> = workers::table
        .filter(workers::home_shop_id.eq(shop_id))
        .order((workers::name.asc(), workers::worker_id.asc()))
        .select(WorkerRow::as_select())
        .load(conn)?;

    rows_into_workers(rows, cipher)
}
}

backend_fn! {
/// Lists workers that have not been assigned a home shop yet.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_unassigned_workers(
    conn: &mut _,
    cipher: &ContactCipher,
) -> Result<Vec<Worker>, PersistenceError> {
    let rows: Vec<WorkerRow> = workers::table
        .filter(workers::home_shop_id.is_null())
        .order((workers::name.asc(), workers::worker_id.asc()))
        .select(WorkerRow::as_select())
        .load(conn)?;

    rows_into_workers(rows, cipher)
}
}

backend_fn! {
/// Loads the given workers. Unknown IDs are skipped.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_workers_by_ids(
    conn: &mut _,
    cipher: &ContactCipher,
    worker_ids: &[i64],
) -> Result<Vec<Worker>, PersistenceError> {
    if worker_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<WorkerRow> = workers::table
        .filter(workers::worker_id.eq_any(worker_ids))
        .order((workers::name.asc(), workers::worker_id.asc()))
        .select(WorkerRow::as_select())
        .load(conn)?;

    rows_into_workers(rows, cipher)
}
}
