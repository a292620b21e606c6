// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Brew Roster.
//!
//! Diesel-backed storage for shops, workers, shifts, exchange requests and
//! login identities.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`** (default) — development, tests and single-site deployments
//! - **`MariaDB`/`MySQL`** — compiled by default, validated by `#[ignore]`d
//!   tests that read `MYSQL_TEST_URL`
//!
//! ## Migration Strategy
//!
//! SQL syntax differs between backends, so there are two migration
//! directories with identical schema semantics:
//!
//! - `migrations/` — `SQLite`
//! - `migrations_mysql/` — `MySQL`/`MariaDB`
//!
//! ## Storage Invariants
//!
//! - At most one shift per `(worker_id, date)` (unique constraint)
//! - At most one pending exchange request per shift
//! - Request state changes are check-and-set on `status = 'pending'`
//! - Worker contact details are sealed with AES-256-GCM before storage

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use brew_roster::{CellEditOutcome, CellEditPlan, ExchangeTransition};
use brew_roster_domain::{ProfileRole, RequestStatus, Shift, ShiftRequest, Shop, Worker};
use diesel::{MysqlConnection, SqliteConnection};
use time::{Date, OffsetDateTime};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives its own shared-cache database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates monomorphic `_sqlite` and `_mysql` versions of a function.
///
/// Diesel needs a concrete backend type at compile time, so the body is
/// duplicated with the connection type substituted. No dispatch happens
/// here; `Persistence` picks the version for its active connection.
///
/// ```ignore
/// backend_fn! {
///     pub fn count_shops(conn: &mut _) -> Result<i64, PersistenceError> {
///         Ok(diesel_schema::shops::table.count().get_result(conn)?)
///     }
/// }
/// ```
///
/// generates `count_shops_sqlite(&mut SqliteConnection)` and
/// `count_shops_mysql(&mut MysqlConnection)`.
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod columns;
mod crypto;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use crypto::{ContactCipher, KEY_LEN};
pub use data_models::{IdentityData, SessionData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Backend-specific database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Backend-agnostic persistence adapter.
///
/// The backend is chosen once at construction; every method dispatches to
/// the matching `_sqlite` or `_mysql` function.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
    cipher: ContactCipher,
}

/// Dispatches a call to the `_sqlite` or `_mysql` version of a function.
///
/// `dispatch!(self, queries::shops, get_shop(shop_id))` calls
/// `queries::shops::get_shop_sqlite(conn, shop_id)` or its `_mysql` twin.
macro_rules! dispatch {
    ($self:ident, $($module:ident)::+, $name:ident ( $($arg:expr),* $(,)? )) => {
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => {
                    $($module)::+::[<$name _sqlite>](conn $(, $arg)*)
                }
                BackendConnection::Mysql(conn) => {
                    $($module)::+::[<$name _mysql>](conn $(, $arg)*)
                }
            }
        }
    };
}

impl Persistence {
    fn from_connection(conn: BackendConnection) -> Result<Self, PersistenceError> {
        Ok(Self {
            conn,
            cipher: ContactCipher::ephemeral()?,
        })
    }

    /// Creates a persistence adapter over a fresh in-memory `SQLite` database.
    ///
    /// Each call gets its own shared-cache database, so tests never see each
    /// other's rows. Contact details are sealed with an ephemeral key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_roster_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Self::from_connection(BackendConnection::Sqlite(conn))
    }

    /// Creates a persistence adapter over a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Self::from_connection(BackendConnection::Sqlite(conn))
    }

    /// Creates a persistence adapter over a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Self::from_connection(BackendConnection::Mysql(conn))
    }

    /// Replaces the contact cipher, typically with one built from the
    /// configured key so sealed contacts survive restarts.
    #[must_use]
    pub fn with_contact_cipher(mut self, cipher: ContactCipher) -> Self {
        self.cipher = cipher;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Shops
    // ========================================================================

    /// Stores a new shop, making its slug unique. Returns the stored shop.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the short code is taken.
    pub fn create_shop(&mut self, shop: &Shop) -> Result<Shop, PersistenceError> {
        dispatch!(self, mutations::shops, create_shop(shop))
    }

    /// Updates a shop's name, short code and staffing target.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop does not exist or the short code is taken.
    pub fn update_shop(&mut self, shop: &Shop) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::shops, update_shop(shop))
    }

    /// Deletes a shop nothing references.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ShopReferenced` while workers or shifts
    /// point at the shop.
    pub fn delete_shop(&mut self, shop_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::shops, delete_shop(shop_id))
    }

    /// Retrieves a shop by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ShopNotFound` if it does not exist.
    pub fn get_shop(&mut self, shop_id: i64) -> Result<Shop, PersistenceError> {
        dispatch!(self, queries::shops, get_shop(shop_id))
    }

    /// Retrieves a shop by slug.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ShopNotFound` if it does not exist.
    pub fn get_shop_by_slug(&mut self, slug: &str) -> Result<Shop, PersistenceError> {
        dispatch!(self, queries::shops, get_shop_by_slug(slug))
    }

    /// Lists all shops ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shops(&mut self) -> Result<Vec<Shop>, PersistenceError> {
        dispatch!(self, queries::shops, list_shops())
    }

    // ========================================================================
    // Workers
    // ========================================================================

    /// Stores a new worker and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if encryption or the insert fails.
    pub fn create_worker(&mut self, worker: &Worker) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::workers, create_worker(&self.cipher, worker))
    }

    /// Overwrites an existing worker.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkerNotFound` if it does not exist.
    pub fn update_worker(&mut self, worker: &Worker) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workers, update_worker(&self.cipher, worker))
    }

    /// Retrieves a worker by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::WorkerNotFound` if it does not exist.
    pub fn get_worker(&mut self, worker_id: i64) -> Result<Worker, PersistenceError> {
        dispatch!(self, queries::workers, get_worker(&self.cipher, worker_id))
    }

    /// Retrieves the worker linked to an identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_worker_by_identity(
        &mut self,
        identity_id: i64,
    ) -> Result<Option<Worker>, PersistenceError> {
        dispatch!(
            self,
            queries::workers,
            get_worker_by_identity(&self.cipher, identity_id)
        )
    }

    /// Lists workers whose home shop is `shop_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_workers_for_shop(&mut self, shop_id: i64) -> Result<Vec<Worker>, PersistenceError> {
        dispatch!(
            self,
            queries::workers,
            list_workers_for_shop(&self.cipher, shop_id)
        )
    }

    /// Lists workers without a home shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_unassigned_workers(&mut self) -> Result<Vec<Worker>, PersistenceError> {
        dispatch!(self, queries::workers, list_unassigned_workers(&self.cipher))
    }

    /// Loads the given workers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_workers_by_ids(
        &mut self,
        worker_ids: &[i64],
    ) -> Result<Vec<Worker>, PersistenceError> {
        dispatch!(
            self,
            queries::workers,
            list_workers_by_ids(&self.cipher, worker_ids)
        )
    }

    /// Writes reconciled experience years in one statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_experience_years(
        &mut self,
        changes: &[(i64, u16)],
    ) -> Result<usize, PersistenceError> {
        dispatch!(self, mutations::workers, update_experience_years(changes))
    }

    // ========================================================================
    // Shifts
    // ========================================================================

    /// Retrieves a shift by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ShiftNotFound` if it does not exist.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Shift, PersistenceError> {
        dispatch!(self, queries::shifts, get_shift(shift_id))
    }

    /// Retrieves a worker's shift on a day, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_shift_for_worker_on(
        &mut self,
        worker_id: i64,
        date: Date,
    ) -> Result<Option<Shift>, PersistenceError> {
        dispatch!(self, queries::shifts, find_shift_for_worker_on(worker_id, date))
    }

    /// Lists shifts owned by a shop in an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_owned_shifts(
        &mut self,
        shop_id: i64,
        from: Date,
        to: Date,
    ) -> Result<Vec<Shift>, PersistenceError> {
        dispatch!(self, queries::shifts, list_owned_shifts(shop_id, from, to))
    }

    /// Lists shifts loaned into a shop from elsewhere in an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_loaned_in_shifts(
        &mut self,
        shop_id: i64,
        from: Date,
        to: Date,
    ) -> Result<Vec<Shift>, PersistenceError> {
        dispatch!(self, queries::shifts, list_loaned_in_shifts(shop_id, from, to))
    }

    /// Applies a planned cell edit.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if a concurrent insert won.
    pub fn apply_shift_mutation(
        &mut self,
        plan: &CellEditPlan,
    ) -> Result<CellEditOutcome, PersistenceError> {
        dispatch!(self, mutations::shifts, apply_shift_mutation(plan))
    }

    // ========================================================================
    // Shift requests
    // ========================================================================

    /// Stores a new pending request and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if one is already pending.
    pub fn insert_shift_request(
        &mut self,
        request: &ShiftRequest,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::shift_requests, insert_shift_request(request))
    }

    /// Retrieves a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` if it does not exist.
    pub fn get_shift_request(&mut self, request_id: i64) -> Result<ShiftRequest, PersistenceError> {
        dispatch!(self, queries::shift_requests, get_shift_request(request_id))
    }

    /// Returns whether the shift has a pending request.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_pending_request(&mut self, shift_id: i64) -> Result<bool, PersistenceError> {
        dispatch!(self, queries::shift_requests, has_pending_request(shift_id))
    }

    /// Lists requests for shifts owned by a shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_shop(
        &mut self,
        shop_id: i64,
        status: Option<RequestStatus>,
    ) -> Result<Vec<ShiftRequest>, PersistenceError> {
        dispatch!(
            self,
            queries::shift_requests,
            list_requests_for_shop(shop_id, status)
        )
    }

    /// Lists requests a worker offered plus open requests by others in the
    /// worker's home shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_worker(
        &mut self,
        worker_id: i64,
        home_shop_id: Option<i64>,
    ) -> Result<Vec<ShiftRequest>, PersistenceError> {
        dispatch!(
            self,
            queries::shift_requests,
            list_requests_for_worker(worker_id, home_shop_id)
        )
    }

    /// Writes a planned exchange transition atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StaleWrite` if the request or shift changed
    /// since it was read.
    pub fn apply_exchange_transition(
        &mut self,
        transition: &ExchangeTransition,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::shift_requests,
            apply_exchange_transition(transition)
        )
    }

    // ========================================================================
    // Identities, sessions & profiles
    // ========================================================================

    /// Creates a login identity and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the login name is taken.
    pub fn create_identity(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        is_superuser: bool,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::identities,
            create_identity(login_name, display_name, password, is_superuser, now)
        )
    }

    /// Retrieves an identity by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_identity_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<IdentityData>, PersistenceError> {
        dispatch!(self, queries::identities, get_identity_by_login(login_name))
    }

    /// Retrieves an identity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_identity_by_id(
        &mut self,
        identity_id: i64,
    ) -> Result<Option<IdentityData>, PersistenceError> {
        dispatch!(self, queries::identities, get_identity_by_id(identity_id))
    }

    /// Checks a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::identities::verify_password(password, password_hash)
    }

    /// Counts stored identities.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_identities(&mut self) -> Result<i64, PersistenceError> {
        dispatch!(self, queries::identities, count_identities())
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(
        &mut self,
        identity_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::identities, update_last_login(identity_id, now))
    }

    /// Creates a session and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        identity_id: i64,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::identities,
            create_session(session_token, identity_id, now, expires_at)
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        dispatch!(self, queries::identities, get_session_by_token(session_token))
    }

    /// Updates a session's last activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::identities,
            update_session_activity(session_id, now)
        )
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::identities, delete_session(session_token))
    }

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        dispatch!(self, mutations::identities, delete_expired_sessions(now))
    }

    /// Returns the identity's profile role, creating a `WORKER` profile if
    /// none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or insert fails.
    pub fn ensure_profile(&mut self, identity_id: i64) -> Result<ProfileRole, PersistenceError> {
        dispatch!(self, mutations::identities, ensure_profile(identity_id))
    }

    /// Returns the identity's profile role without creating one.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile_role(
        &mut self,
        identity_id: i64,
    ) -> Result<Option<ProfileRole>, PersistenceError> {
        dispatch!(self, queries::identities, get_profile_role(identity_id))
    }

    /// Grants an identity administration of a shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity or shop does not exist.
    pub fn add_shop_admin(
        &mut self,
        identity_id: i64,
        shop_id: i64,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::identities, add_shop_admin(identity_id, shop_id))
    }

    /// Lists the shops an identity administers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_admin_shop_ids(
        &mut self,
        identity_id: i64,
    ) -> Result<BTreeSet<i64>, PersistenceError> {
        dispatch!(self, queries::identities, list_admin_shop_ids(identity_id))
    }
}
