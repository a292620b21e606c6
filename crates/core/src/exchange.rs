// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift-exchange state machine.
//!
//! ```text
//! offer ──► PENDING ──take──► PENDING (claimant recorded, last claim wins)
//!              │
//!              ├──approve──► APPROVED (shift reassigned to claimant)
//!              ├──reject───► REJECTED
//!              └──cancel───► CANCELED
//! ```
//!
//! Each function validates one transition and returns the new request value.
//! Storage applies it with a check-and-set on `status = 'pending'`, so a
//! concurrent winner turns the loser's write into a `Conflict`.

use crate::access::{require_assigned_worker, require_shop_admin};
use crate::error::CoreError;
use brew_roster_domain::{RequestStatus, Scope, Shift, ShiftRequest, Worker};
use time::OffsetDateTime;

/// Moves a shift from one worker to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftReassignment {
    /// The shift being moved.
    pub shift_id: i64,
    /// The worker who held it (recorded as the replacement worker).
    pub from_worker_id: i64,
    /// The worker who receives it.
    pub to_worker_id: i64,
}

/// The outcome of an approved, rejected or canceled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeTransition {
    /// The request after the transition.
    pub request: ShiftRequest,
    /// The shift move to apply in the same transaction, if any.
    pub reassignment: Option<ShiftReassignment>,
}

fn ensure_open(request: &ShiftRequest, target: RequestStatus) -> Result<(), CoreError> {
    request
        .status
        .validate_transition(target)
        .map_err(|_| CoreError::conflict(&format!("request is already {}", request.status)))
}

/// A shift keeps its owning shop when it changes hands, so only that
/// shop's workers may receive it.
fn ensure_same_shop(claimant_home_shop_id: Option<i64>, shift: &Shift) -> Result<(), CoreError> {
    if claimant_home_shop_id == Some(shift.shop_id) {
        Ok(())
    } else {
        Err(CoreError::invalid(
            "claimant does not work at the shift's shop",
        ))
    }
}

fn persisted_shift_id(shift: &Shift) -> Result<i64, CoreError> {
    shift
        .shift_id()
        .ok_or_else(|| CoreError::invalid("shift has not been saved"))
}

/// Offers a shift for exchange.
///
/// # Arguments
///
/// * `scope` - The acting scope
/// * `actor` - The acting worker's record
/// * `shift` - The offered shift
/// * `pending_exists` - Whether the shift already has a pending request
/// * `reason` - Free-text reason
/// * `now` - The current instant
///
/// # Errors
///
/// Returns `Forbidden` if the actor is not the shift's assigned worker and
/// `Conflict` if a pending request already exists.
pub fn plan_offer(
    scope: &Scope,
    actor: &Worker,
    shift: &Shift,
    pending_exists: bool,
    reason: &str,
    now: OffsetDateTime,
) -> Result<ShiftRequest, CoreError> {
    let actor_id: i64 = require_assigned_worker(scope, actor, "offer shift")?;

    if shift.worker_id != actor_id {
        return Err(CoreError::forbidden(
            "offer shift",
            "only the assigned worker can offer a shift",
        ));
    }

    if pending_exists {
        return Err(CoreError::conflict(
            "shift already has a pending exchange request",
        ));
    }

    Ok(ShiftRequest::new(
        persisted_shift_id(shift)?,
        actor_id,
        reason.trim().to_string(),
        now,
    ))
}

/// Volunteers the acting worker for a pending request.
///
/// The request stays `Pending`; a later claim replaces an earlier one.
///
/// # Errors
///
/// Returns `Conflict` if the request is resolved and `InvalidOperation` if
/// the volunteer is the offering worker or works at a different shop than
/// the one the shift belongs to.
pub fn plan_take(
    scope: &Scope,
    actor: &Worker,
    request: &ShiftRequest,
    shift: &Shift,
    now: OffsetDateTime,
) -> Result<ShiftRequest, CoreError> {
    let actor_id: i64 = require_assigned_worker(scope, actor, "take shift")?;

    if request.status != RequestStatus::Pending {
        return Err(CoreError::conflict(&format!(
            "request is already {}",
            request.status
        )));
    }

    if request.offered_by == actor_id {
        return Err(CoreError::invalid("cannot take your own shift"));
    }

    ensure_same_shop(actor.home_shop_id, shift)?;

    let mut updated: ShiftRequest = request.clone();
    updated.taken_by = Some(actor_id);
    updated.taken_at = Some(now);
    Ok(updated)
}

/// Approves a pending request and reassigns the shift to the claimant.
///
/// # Arguments
///
/// * `scope` - The acting scope
/// * `acting_identity_id` - The approving identity, recorded on the request
/// * `request` - The request being approved
/// * `shift` - The shift it references
/// * `claimant_home_shop_id` - The claimant's current home shop
/// * `claimant_busy` - Whether the claimant already has a shift on that day
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - The scope does not administer the shift's shop (`Forbidden`)
/// - The request is resolved, or the shift moved since the offer (`Conflict`)
/// - Nobody has claimed the shift, the claimant has left the shift's shop,
///   or the claimant already works that day (`InvalidOperation`)
pub fn plan_approve(
    scope: &Scope,
    acting_identity_id: i64,
    request: &ShiftRequest,
    shift: &Shift,
    claimant_home_shop_id: Option<i64>,
    claimant_busy: bool,
    now: OffsetDateTime,
) -> Result<ExchangeTransition, CoreError> {
    require_shop_admin(scope, shift.shop_id, "approve shift request")?;
    ensure_open(request, RequestStatus::Approved)?;

    let Some(claimant) = request.taken_by else {
        return Err(CoreError::invalid("no worker has taken this shift yet"));
    };

    if shift.worker_id != request.offered_by {
        return Err(CoreError::conflict(
            "shift no longer belongs to the offering worker",
        ));
    }

    ensure_same_shop(claimant_home_shop_id, shift)?;

    if claimant_busy {
        return Err(CoreError::invalid(
            "claimant already has a shift on that day",
        ));
    }

    let mut updated: ShiftRequest = request.clone();
    updated.status = RequestStatus::Approved;
    updated.approved_by = Some(acting_identity_id);
    updated.approved_at = Some(now);

    Ok(ExchangeTransition {
        request: updated,
        reassignment: Some(ShiftReassignment {
            shift_id: persisted_shift_id(shift)?,
            from_worker_id: request.offered_by,
            to_worker_id: claimant,
        }),
    })
}

/// Rejects a pending request.
///
/// # Errors
///
/// Returns `Forbidden` if the scope does not administer the shift's shop and
/// `Conflict` if the request is resolved.
pub fn plan_reject(
    scope: &Scope,
    acting_identity_id: i64,
    request: &ShiftRequest,
    shift: &Shift,
    now: OffsetDateTime,
) -> Result<ExchangeTransition, CoreError> {
    require_shop_admin(scope, shift.shop_id, "reject shift request")?;
    ensure_open(request, RequestStatus::Rejected)?;

    let mut updated: ShiftRequest = request.clone();
    updated.status = RequestStatus::Rejected;
    updated.approved_by = Some(acting_identity_id);
    updated.approved_at = Some(now);

    Ok(ExchangeTransition {
        request: updated,
        reassignment: None,
    })
}

/// Withdraws a pending request.
///
/// # Errors
///
/// Returns `Forbidden` unless the actor offered the shift and `Conflict` if
/// the request is resolved.
pub fn plan_cancel(
    scope: &Scope,
    actor: &Worker,
    request: &ShiftRequest,
) -> Result<ExchangeTransition, CoreError> {
    let actor_id: i64 = require_assigned_worker(scope, actor, "cancel shift request")?;

    if request.offered_by != actor_id {
        return Err(CoreError::forbidden(
            "cancel shift request",
            "only the offering worker can cancel",
        ));
    }

    ensure_open(request, RequestStatus::Canceled)?;

    let mut updated: ShiftRequest = request.clone();
    updated.status = RequestStatus::Canceled;

    Ok(ExchangeTransition {
        request: updated,
        reassignment: None,
    })
}
