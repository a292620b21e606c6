// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planning of schedule-cell edits.
//!
//! A plan is computed without storage access. Applying it is an upsert or
//! delete keyed by `(worker, date)`, done by the persistence layer inside a
//! transaction.

use crate::access::require_shop_admin;
use crate::error::CoreError;
use brew_roster_domain::{CellIntent, CellParser, Scope, ShiftKind, Shop, Worker};
use time::Date;

/// The storage change a cell edit resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftMutation {
    /// Delete the `(worker, date)` row if present.
    Clear,
    /// Insert or overwrite the `(worker, date)` row with this kind.
    Upsert(ShiftKind),
}

/// What applying a [`ShiftMutation`] did to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEditOutcome {
    /// A new row was inserted.
    Created,
    /// An existing row changed kind.
    Updated,
    /// An existing row was removed.
    Deleted,
    /// Nothing changed.
    Unchanged,
}

impl CellEditOutcome {
    /// Classifies a mutation against the row currently stored.
    #[must_use]
    pub fn classify(existing: Option<&ShiftKind>, mutation: &ShiftMutation) -> Self {
        match (existing, mutation) {
            (None, ShiftMutation::Clear) => Self::Unchanged,
            (Some(_), ShiftMutation::Clear) => Self::Deleted,
            (None, ShiftMutation::Upsert(_)) => Self::Created,
            (Some(current), ShiftMutation::Upsert(kind)) if current == kind => Self::Unchanged,
            (Some(_), ShiftMutation::Upsert(_)) => Self::Updated,
        }
    }

    /// Returns the stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
        }
    }
}

/// A validated, authorized cell edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEditPlan {
    /// The worker whose row is edited.
    pub worker_id: i64,
    /// The shop whose roster is edited.
    pub shop_id: i64,
    /// The edited day.
    pub date: Date,
    /// The parsed intent.
    pub intent: CellIntent,
    /// The storage change.
    pub mutation: ShiftMutation,
}

impl CellEditPlan {
    /// Returns the applied kind name (`cleared`, `overtime`, `timed`, `loaned`).
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        self.intent.name()
    }
}

/// Plans a single schedule-cell edit.
///
/// # Arguments
///
/// * `scope` - The acting scope
/// * `parser` - The configured cell parser
/// * `shops` - All known shops
/// * `worker` - The worker whose row is edited
/// * `shop_id` - The roster being edited
/// * `date` - The day being edited
/// * `raw` - The raw cell text
///
/// # Errors
///
/// Returns an error if:
/// - The text does not parse (`DomainViolation`)
/// - `shop_id` is unknown (`NotFound`)
/// - The scope does not administer `shop_id`, or the worker's home shop is
///   not `shop_id` (`Forbidden`)
/// - A loan names the worker's own home shop (`InvalidOperation`)
pub fn plan_cell_edit(
    scope: &Scope,
    parser: &CellParser,
    shops: &[Shop],
    worker: &Worker,
    shop_id: i64,
    date: Date,
    raw: &str,
) -> Result<CellEditPlan, CoreError> {
    let intent: CellIntent = parser.parse(raw, shops)?;

    if !shops.iter().any(|shop| shop.shop_id() == Some(shop_id)) {
        return Err(CoreError::NotFound {
            resource: String::from("Shop"),
            id: shop_id.to_string(),
        });
    }

    let worker_id: i64 = worker.worker_id().ok_or_else(|| CoreError::NotFound {
        resource: String::from("Worker"),
        id: worker.name.clone(),
    })?;

    require_shop_admin(scope, shop_id, "edit schedule")?;

    if worker.home_shop_id != Some(shop_id) {
        return Err(CoreError::forbidden(
            "edit schedule",
            "cannot edit another shop's roster",
        ));
    }

    let mutation: ShiftMutation = match &intent {
        CellIntent::Clear => ShiftMutation::Clear,
        CellIntent::Loaned(target) if target.shop_id() == Some(shop_id) => {
            return Err(CoreError::invalid(
                "a loan must name a shop other than the worker's home shop",
            ));
        }
        other => ShiftMutation::Upsert(other.shift_kind().ok_or_else(|| {
            CoreError::invalid("loan target shop has not been saved")
        })?),
    };

    Ok(CellEditPlan {
        worker_id,
        shop_id,
        date,
        intent,
        mutation,
    })
}
