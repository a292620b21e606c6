// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use brew_roster::CoreError;
use brew_roster_domain::DomainError;
use brew_roster_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The identity is known but may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// What the action requires.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed or the session is no longer valid.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The acting scope may not perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// A schedule-cell edit could not be parsed.
    ParseError {
        /// The rejected text.
        input: String,
        /// A human-readable description of the problem.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The record is in a state that conflicts with the request.
    Conflict {
        /// Description of the conflict.
        reason: String,
    },
    /// The request is well-formed but not valid in the current state.
    InvalidOperation {
        /// Why the request is invalid.
        reason: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Not allowed to {action}: {reason}")
            }
            Self::ParseError { input, message } => {
                write!(f, "Cannot parse '{input}': {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { reason } => write!(f, "Conflict: {reason}"),
            Self::InvalidOperation { reason } => write!(f, "Invalid operation: {reason}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Forbidden {
                action,
                reason: format!("requires {required_role}"),
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid_input(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidTime { input } => ApiError::ParseError { input, message },
        DomainError::UnknownToken { token } => ApiError::ParseError {
            input: token,
            message,
        },
        DomainError::InvalidShopName(_) => invalid_input("name", message),
        DomainError::InvalidShortCode { .. } => invalid_input("short_code", message),
        DomainError::DuplicateShortCode(_) => ApiError::Conflict { reason: message },
        DomainError::InvalidMinimumWorkers(_) => invalid_input("minimum_workers", message),
        DomainError::InvalidWorkerName(_) => invalid_input("name", message),
        DomainError::InvalidMonth { .. } => invalid_input("month", message),
        DomainError::InvalidRequestStatus { .. } => invalid_input("status", message),
        DomainError::InvalidStatusTransition { .. } => ApiError::Conflict { reason: message },
        DomainError::InvalidRole(_) => invalid_input("role", message),
        DomainError::InvalidTimezone(_) => invalid_input("timezone", message),
        DomainError::DateArithmeticOverflow { .. } | DomainError::DateParseError { .. } => {
            invalid_input("date", message)
        }
        DomainError::InvalidShiftKind { .. } => ApiError::Internal { message },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Forbidden { action, reason } => ApiError::Forbidden { action, reason },
        CoreError::NotFound { resource, id } => ApiError::ResourceNotFound {
            resource_type: resource,
            message: format!("'{id}' does not exist"),
        },
        CoreError::Conflict { reason } => ApiError::Conflict { reason },
        CoreError::InvalidOperation { reason } => ApiError::InvalidOperation { reason },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint failures become conflicts; missing rows become not-found.
/// Everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::UniqueViolation(_) | PersistenceError::StaleWrite { .. } => {
            ApiError::Conflict { reason: message }
        }
        PersistenceError::ShopReferenced { .. } => ApiError::Conflict { reason: message },
        PersistenceError::ForeignKeyViolation(_) => ApiError::InvalidOperation { reason: message },
        PersistenceError::ShopNotFound(_) => not_found("Shop", message),
        PersistenceError::WorkerNotFound(_) => not_found("Worker", message),
        PersistenceError::ShiftNotFound(_) => not_found("Shift", message),
        PersistenceError::RequestNotFound(_) => not_found("Shift request", message),
        PersistenceError::IdentityNotFound(_) => not_found("Identity", message),
        PersistenceError::NotFound(_) => not_found("Record", message),
        PersistenceError::SessionNotFound(reason) | PersistenceError::SessionExpired(reason) => {
            ApiError::AuthenticationFailed { reason }
        }
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled
        | PersistenceError::CorruptRow(_)
        | PersistenceError::EncryptionError(_)
        | PersistenceError::Other(_) => ApiError::Internal { message },
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}
