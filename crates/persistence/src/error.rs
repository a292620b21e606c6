// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// A check-and-set update matched no row because the record changed.
    StaleWrite {
        /// The kind of record.
        entity: &'static str,
        /// Its identifier.
        id: i64,
    },
    /// The requested shop was not found.
    ShopNotFound(String),
    /// The requested worker was not found.
    WorkerNotFound(i64),
    /// The requested shift was not found.
    ShiftNotFound(i64),
    /// The requested shift request was not found.
    RequestNotFound(i64),
    /// The requested identity was not found.
    IdentityNotFound(String),
    /// The requested session was not found.
    SessionNotFound(String),
    /// Session has expired.
    SessionExpired(String),
    /// Shop cannot be deleted because workers or shifts reference it.
    ShopReferenced {
        /// The shop that is still referenced.
        shop_id: i64,
    },
    /// A stored row could not be converted to a domain value.
    CorruptRow(String),
    /// Contact encryption or decryption failed.
    EncryptionError(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => {
                write!(f, "Foreign key constraint violated: {msg}")
            }
            Self::StaleWrite { entity, id } => {
                write!(f, "{entity} {id} was modified concurrently")
            }
            Self::ShopNotFound(msg) => write!(f, "Shop not found: {msg}"),
            Self::WorkerNotFound(id) => write!(f, "Worker not found: {id}"),
            Self::ShiftNotFound(id) => write!(f, "Shift not found: {id}"),
            Self::RequestNotFound(id) => write!(f, "Shift request not found: {id}"),
            Self::IdentityNotFound(msg) => write!(f, "Identity not found: {msg}"),
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::SessionExpired(msg) => write!(f, "Session expired: {msg}"),
            Self::ShopReferenced { shop_id } => {
                write!(
                    f,
                    "Shop {shop_id} cannot be deleted: referenced by workers or shifts"
                )
            }
            Self::CorruptRow(msg) => write!(f, "Stored row is invalid: {msg}"),
            Self::EncryptionError(msg) => write!(f, "Encryption error: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<brew_roster_domain::DomainError> for PersistenceError {
    fn from(err: brew_roster_domain::DomainError) -> Self {
        Self::CorruptRow(err.to_string())
    }
}
