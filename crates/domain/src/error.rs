// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Shop name is empty or invalid.
    InvalidShopName(String),
    /// Shop short code is empty, too long, or contains non-printable characters.
    InvalidShortCode {
        /// The rejected short code.
        short_code: String,
        /// Why the short code was rejected.
        reason: String,
    },
    /// A short code is already used by another shop.
    DuplicateShortCode(String),
    /// Minimum staffing target is out of range.
    InvalidMinimumWorkers(i64),
    /// Worker name is empty or invalid.
    InvalidWorkerName(String),
    /// A cell edit looked like a time but did not parse as `HH:MM`.
    InvalidTime {
        /// The text that failed to parse.
        input: String,
    },
    /// A cell edit matched no rule and no shop short code.
    UnknownToken {
        /// The unrecognized token.
        token: String,
    },
    /// Year/month pair does not name a calendar month.
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month number.
        month: u8,
    },
    /// A stored shift row carried more than one (or none) of the kind columns.
    InvalidShiftKind {
        /// Description of the column combination.
        reason: String,
    },
    /// Shift request status string is not recognized.
    InvalidRequestStatus {
        /// The unrecognized status.
        status: String,
    },
    /// Shift request status transition is not permitted.
    InvalidStatusTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// Profile role string is not recognized.
    InvalidRole(String),
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidShopName(msg) => write!(f, "Invalid shop name: {msg}"),
            Self::InvalidShortCode { short_code, reason } => {
                write!(f, "Invalid short code '{short_code}': {reason}")
            }
            Self::DuplicateShortCode(code) => {
                write!(f, "Short code '{code}' is already used by another shop")
            }
            Self::InvalidMinimumWorkers(value) => {
                write!(
                    f,
                    "Invalid minimum workers: {value}. Must be between 0 and 100"
                )
            }
            Self::InvalidWorkerName(msg) => write!(f, "Invalid worker name: {msg}"),
            Self::InvalidTime { input } => {
                write!(f, "'{input}' is not a valid HH:MM start time")
            }
            Self::UnknownToken { token } => {
                write!(f, "'{token}' is neither a time, '+', nor a known shop code")
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "{year}-{month:02} is not a valid calendar month")
            }
            Self::InvalidShiftKind { reason } => write!(f, "Invalid shift kind: {reason}"),
            Self::InvalidRequestStatus { status } => {
                write!(f, "Invalid shift request status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot move shift request from {from} to {to}: {reason}")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone: {tz}"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
