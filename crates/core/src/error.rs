// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use brew_roster_domain::DomainError;

/// Errors that can occur while planning a schedule change or exchange transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated (includes cell parse errors).
    DomainViolation(DomainError),
    /// The acting scope may not perform the action.
    Forbidden {
        /// The attempted action.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// A referenced record does not exist.
    NotFound {
        /// The kind of record.
        resource: String,
        /// The identifier that was looked up.
        id: String,
    },
    /// The record changed state underneath the caller.
    Conflict {
        /// Description of the conflicting state.
        reason: String,
    },
    /// The action is well-formed but not valid in the current state.
    InvalidOperation {
        /// Why the action is invalid.
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn forbidden(action: &str, reason: &str) -> Self {
        Self::Forbidden {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn conflict(reason: &str) -> Self {
        Self::Conflict {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid(reason: &str) -> Self {
        Self::InvalidOperation {
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Forbidden { action, reason } => {
                write!(f, "Not allowed to {action}: {reason}")
            }
            Self::NotFound { resource, id } => write!(f, "{resource} '{id}' not found"),
            Self::Conflict { reason } => write!(f, "Conflict: {reason}"),
            Self::InvalidOperation { reason } => write!(f, "Invalid operation: {reason}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
