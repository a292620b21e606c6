// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::Date;

/// A shop's compact cross-reference token.
///
/// Short codes are matched exactly and case-sensitively when a schedule
/// cell names another shop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCode {
    value: String,
}

impl ShortCode {
    /// Maximum length of a short code, in characters.
    pub const MAX_LEN: usize = 10;

    /// Creates a validated short code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShortCode` if the value is empty, longer
    /// than ten characters, or contains whitespace or control characters.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let reject = |reason: &str| DomainError::InvalidShortCode {
            short_code: value.to_string(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(reject("short code cannot be empty"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(reject("short code must be at most 10 characters"));
        }
        if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(reject("short code must contain printable characters only"));
        }

        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Returns the short code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// URL-stable shop identifier.
///
/// A slug is derived from the shop name once, when the shop is created, and
/// is never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug {
    value: String,
}

impl Slug {
    /// Fallback used when a name has no alphanumeric characters at all.
    pub const FALLBACK: &'static str = "shop";

    /// Derives a slug from a display name.
    ///
    /// Letters and digits are lower-cased and kept, runs of anything else
    /// collapse into a single `-`, and leading/trailing dashes are trimmed.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let mut value: String = String::with_capacity(name.len());
        let mut pending_dash: bool = false;

        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !value.is_empty() {
                    value.push('-');
                }
                pending_dash = false;
                value.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if value.is_empty() {
            value.push_str(Self::FALLBACK);
        }

        Self { value }
    }

    /// Rebuilds a slug that was already stored.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// Returns a suffixed variant used to resolve collisions (`name-2`, `name-3`, ...).
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self {
            value: format!("{}-{n}", self.value),
        }
    }

    /// Returns the slug value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A coffee-shop location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the shop has not been persisted yet.
    shop_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Unique cross-shop token.
    pub short_code: ShortCode,
    /// URL-stable identifier.
    pub slug: Slug,
    /// Daily staffing target used to flag understaffed days.
    pub minimum_workers: u32,
}

impl Shop {
    /// Default daily staffing target.
    pub const DEFAULT_MINIMUM_WORKERS: u32 = 4;

    /// Creates a new, not yet persisted shop with a slug derived from `name`.
    #[must_use]
    pub fn new(name: &str, short_code: ShortCode, minimum_workers: u32) -> Self {
        Self {
            shop_id: None,
            name: name.to_string(),
            slug: Slug::from_name(name),
            short_code,
            minimum_workers,
        }
    }

    /// Creates a `Shop` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        shop_id: i64,
        name: String,
        short_code: ShortCode,
        slug: Slug,
        minimum_workers: u32,
    ) -> Self {
        Self {
            shop_id: Some(shop_id),
            name,
            short_code,
            slug,
            minimum_workers,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn shop_id(&self) -> Option<i64> {
        self.shop_id
    }
}

/// A person who works shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// The canonical numeric identifier assigned by the database.
    worker_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Contact details. Plaintext here; encrypted by the storage layer.
    pub contact: Option<String>,
    /// Date experience is counted from.
    pub experience_start: Option<Date>,
    /// Cached whole years of experience. Only trustworthy after reconciliation.
    pub experience_years: u16,
    /// Home shop. `None` means the worker is unassigned.
    pub home_shop_id: Option<i64>,
    /// Termination date.
    pub fired_at: Option<Date>,
    /// Start of the worker's current or upcoming vacation.
    pub vacation_start: Option<Date>,
    /// Linked login identity.
    pub identity_id: Option<i64>,
}

impl Worker {
    /// Creates a new, not yet persisted worker.
    #[must_use]
    pub const fn new(name: String, experience_start: Option<Date>) -> Self {
        Self {
            worker_id: None,
            name,
            contact: None,
            experience_start,
            experience_years: 0,
            home_shop_id: None,
            fired_at: None,
            vacation_start: None,
            identity_id: None,
        }
    }

    /// Returns a copy of this worker carrying a persisted ID.
    #[must_use]
    pub fn with_id(mut self, worker_id: i64) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn worker_id(&self) -> Option<i64> {
        self.worker_id
    }

    /// Returns whether the worker has no home shop yet.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        self.home_shop_id.is_none()
    }

    /// Returns whether this worker belongs on a home roster for the month
    /// starting at `first_day`.
    ///
    /// A worker terminated after the first day of the month still appears
    /// for that month.
    #[must_use]
    pub fn is_on_roster_for(&self, first_day: Date) -> bool {
        self.fired_at.is_none_or(|fired| fired > first_day)
    }
}

/// The role stored on a login identity's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProfileRole {
    /// Ordinary worker.
    #[default]
    Worker,
    /// Administrator of one or more shops.
    ShopAdmin,
}

impl ProfileRole {
    /// Converts this role to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "WORKER",
            Self::ShopAdmin => "SHOP_ADMIN",
        }
    }
}

impl FromStr for ProfileRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORKER" => Ok(Self::Worker),
            "SHOP_ADMIN" => Ok(Self::ShopAdmin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved authorization context of an acting identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Global administrator.
    SuperAdmin,
    /// Administrator of an explicit set of shops.
    ShopAdmin {
        /// Shops this admin may manage.
        shop_ids: BTreeSet<i64>,
    },
    /// A worker acting on their own behalf.
    Worker {
        /// The linked worker record.
        worker_id: i64,
    },
}

impl Scope {
    /// Returns whether this scope may administer `shop_id`.
    #[must_use]
    pub fn manages_shop(&self, shop_id: i64) -> bool {
        match self {
            Self::SuperAdmin => true,
            Self::ShopAdmin { shop_ids } => shop_ids.contains(&shop_id),
            Self::Worker { .. } => false,
        }
    }

    /// Returns the acting worker ID, if this is a worker scope.
    #[must_use]
    pub const fn worker_id(&self) -> Option<i64> {
        match self {
            Self::Worker { worker_id } => Some(*worker_id),
            Self::SuperAdmin | Self::ShopAdmin { .. } => None,
        }
    }

    /// Returns a short label for logs and error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::ShopAdmin { .. } => "SHOP_ADMIN",
            Self::Worker { .. } => "WORKER",
        }
    }
}
