// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shifts: the atomic scheduling fact.
//!
//! A worker has at most one shift per calendar day. A day off is the absence
//! of a shift, never a row with every field empty.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// What kind of work slot a shift is.
///
/// Storage keeps these as three nullable columns; this type guarantees that
/// exactly one of them is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShiftKind {
    /// Extra shift with no fixed start time.
    Overtime,
    /// Regular shift starting at the given time.
    Timed {
        /// Start time.
        start: Time,
    },
    /// Shift worked at another shop, which receives the coverage credit.
    Loaned {
        /// The shop the worker is loaned to.
        shop_id: i64,
    },
}

impl ShiftKind {
    /// Rebuilds a kind from its storage columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShiftKind` if zero or more than one column
    /// is set.
    pub fn from_columns(
        start_time: Option<Time>,
        is_overtime: bool,
        another_shop_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        match (start_time, is_overtime, another_shop_id) {
            (Some(start), false, None) => Ok(Self::Timed { start }),
            (None, true, None) => Ok(Self::Overtime),
            (None, false, Some(shop_id)) => Ok(Self::Loaned { shop_id }),
            (None, false, None) => Err(DomainError::InvalidShiftKind {
                reason: String::from("no start time, overtime flag, or loan target set"),
            }),
            _ => Err(DomainError::InvalidShiftKind {
                reason: String::from("more than one of start time, overtime, loan target set"),
            }),
        }
    }

    /// Splits the kind into `(start_time, is_overtime, another_shop_id)` columns.
    #[must_use]
    pub const fn to_columns(&self) -> (Option<Time>, bool, Option<i64>) {
        match self {
            Self::Overtime => (None, true, None),
            Self::Timed { start } => (Some(*start), false, None),
            Self::Loaned { shop_id } => (None, false, Some(*shop_id)),
        }
    }

    /// Returns the stable name of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Overtime => "overtime",
            Self::Timed { .. } => "timed",
            Self::Loaned { .. } => "loaned",
        }
    }

    /// Returns the loan target, if any.
    #[must_use]
    pub const fn loaned_to(&self) -> Option<i64> {
        match self {
            Self::Loaned { shop_id } => Some(*shop_id),
            Self::Overtime | Self::Timed { .. } => None,
        }
    }
}

/// A worker's assignment for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// The canonical numeric identifier assigned by the database.
    shift_id: Option<i64>,
    /// Who works the shift.
    pub worker_id: i64,
    /// The shop whose roster this shift belongs to.
    pub shop_id: i64,
    /// The calendar day.
    pub date: Date,
    /// What kind of slot this is.
    pub kind: ShiftKind,
    /// Who held this shift before an approved exchange moved it.
    pub replacement_worker_id: Option<i64>,
}

impl Shift {
    /// Creates a new, not yet persisted shift.
    #[must_use]
    pub const fn new(worker_id: i64, shop_id: i64, date: Date, kind: ShiftKind) -> Self {
        Self {
            shift_id: None,
            worker_id,
            shop_id,
            date,
            kind,
            replacement_worker_id: None,
        }
    }

    /// Returns a copy of this shift carrying a persisted ID.
    #[must_use]
    pub const fn with_id(mut self, shift_id: i64) -> Self {
        self.shift_id = Some(shift_id);
        self
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn shift_id(&self) -> Option<i64> {
        self.shift_id
    }

    /// Returns whether this shift counts toward `shop_id`'s coverage.
    ///
    /// A loaned shift counts only for the shop it is loaned to; any other
    /// shift counts for its owning shop.
    #[must_use]
    pub fn counts_toward(&self, shop_id: i64) -> bool {
        self.kind
            .loaned_to()
            .map_or(self.shop_id == shop_id, |target| target == shop_id)
    }
}
