// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift-exchange request states and transition rules.
//!
//! A request starts `Pending` and moves exactly once into a terminal state.
//! Nothing ever leaves a terminal state.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Lifecycle states of a shift-exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Offered and awaiting a volunteer and/or a decision.
    Pending,
    /// Ratified by an admin; the shift now belongs to the claimant.
    Approved,
    /// Declined by an admin.
    Rejected,
    /// Claim recorded outside the approval flow.
    Taken,
    /// Withdrawn by the offering worker.
    Canceled,
}

impl RequestStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Taken => "taken",
            Self::Canceled => "canceled",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` when the current status
    /// is terminal or the target is `Pending`.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "request is already resolved".to_string(),
            });
        }

        if target == Self::Pending {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: "request is already pending".to_string(),
            });
        }

        Ok(())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "taken" => Ok(Self::Taken),
            "canceled" => Ok(Self::Canceled),
            _ => Err(DomainError::InvalidRequestStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket offering one shift for exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// The canonical numeric identifier assigned by the database.
    request_id: Option<i64>,
    /// The offered shift.
    pub shift_id: i64,
    /// The worker offering the shift.
    pub offered_by: i64,
    /// Free-text reason given by the offering worker.
    pub reason: String,
    /// Current lifecycle state.
    pub status: RequestStatus,
    /// When the offer was made.
    pub requested_at: OffsetDateTime,
    /// The most recent volunteer.
    pub taken_by: Option<i64>,
    /// When the most recent volunteer claimed the shift.
    pub taken_at: Option<OffsetDateTime>,
    /// Identity of the admin who approved or rejected the request.
    pub approved_by: Option<i64>,
    /// When the request was approved or rejected.
    pub approved_at: Option<OffsetDateTime>,
}

impl ShiftRequest {
    /// Creates a new pending request.
    #[must_use]
    pub const fn new(
        shift_id: i64,
        offered_by: i64,
        reason: String,
        requested_at: OffsetDateTime,
    ) -> Self {
        Self {
            request_id: None,
            shift_id,
            offered_by,
            reason,
            status: RequestStatus::Pending,
            requested_at,
            taken_by: None,
            taken_at: None,
            approved_by: None,
            approved_at: None,
        }
    }

    /// Returns a copy of this request carrying a persisted ID.
    #[must_use]
    pub fn with_id(mut self, request_id: i64) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn request_id(&self) -> Option<i64> {
        self.request_id
    }

    /// Returns whether a volunteer has claimed the shift.
    #[must_use]
    pub const fn has_claimant(&self) -> bool {
        self.taken_by.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Taken,
        RequestStatus::Canceled,
    ];

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_invalid_status_string() {
        assert!(matches!(
            "PENDING".parse::<RequestStatus>(),
            Err(DomainError::InvalidRequestStatus { .. })
        ));
    }

    #[test]
    fn test_only_pending_is_open() {
        for status in ALL {
            assert_eq!(status.is_terminal(), status != RequestStatus::Pending);
        }
    }

    #[test]
    fn test_pending_moves_to_every_terminal_state() {
        for target in ALL.into_iter().filter(RequestStatus::is_terminal) {
            assert!(RequestStatus::Pending.validate_transition(target).is_ok());
        }
        assert!(
            RequestStatus::Pending
                .validate_transition(RequestStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for from in ALL.into_iter().filter(RequestStatus::is_terminal) {
            for to in ALL {
                assert!(from.validate_transition(to).is_err(), "{from} -> {to}");
            }
        }
    }
}
