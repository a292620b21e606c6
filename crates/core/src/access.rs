// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scope checks shared by every write path.
//!
//! These functions look only at the resolved [`Scope`] and the records
//! involved. They never consult storage.

use crate::error::CoreError;
use brew_roster_domain::{Scope, Worker};

/// Requires a global administrator.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` for any other scope.
pub fn require_super_admin(scope: &Scope, action: &str) -> Result<(), CoreError> {
    if matches!(scope, Scope::SuperAdmin) {
        Ok(())
    } else {
        Err(CoreError::forbidden(action, "requires a super admin"))
    }
}

/// Requires a scope that administers `shop_id`.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` unless the scope is a super admin or a
/// shop admin whose shop set contains `shop_id`.
pub fn require_shop_admin(scope: &Scope, shop_id: i64, action: &str) -> Result<(), CoreError> {
    if scope.manages_shop(shop_id) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            action,
            &format!("{} does not manage shop {shop_id}", scope.label()),
        ))
    }
}

/// Returns whether the scope administers the worker's home shop.
///
/// Unassigned workers are administered by super admins only.
#[must_use]
pub fn manages_worker(scope: &Scope, worker: &Worker) -> bool {
    worker.home_shop_id.map_or_else(
        || matches!(scope, Scope::SuperAdmin),
        |shop_id| scope.manages_shop(shop_id),
    )
}

/// Requires a worker scope acting as `worker`, with a home shop.
///
/// Unassigned workers may log in but take no part in shift exchanges.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if the scope is not a worker scope, names a
/// different worker, or the worker has no home shop.
pub fn require_assigned_worker(
    scope: &Scope,
    worker: &Worker,
    action: &str,
) -> Result<i64, CoreError> {
    let Some(acting_id) = scope.worker_id() else {
        return Err(CoreError::forbidden(action, "only workers can do this"));
    };

    if worker.worker_id() != Some(acting_id) {
        return Err(CoreError::forbidden(
            action,
            "acting worker does not match the worker record",
        ));
    }

    if worker.is_unassigned() {
        return Err(CoreError::forbidden(
            action,
            "worker is not assigned to a shop yet",
        ));
    }

    Ok(acting_id)
}

/// Authorizes setting a worker's vacation start.
///
/// Allowed for an admin of the worker's home shop or the worker themself.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` otherwise.
pub fn authorize_vacation(scope: &Scope, worker: &Worker) -> Result<(), CoreError> {
    let is_self: bool = scope.worker_id().is_some() && scope.worker_id() == worker.worker_id();

    if is_self || manages_worker(scope, worker) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            "register vacation",
            "only the worker or an admin of their shop may do this",
        ))
    }
}

/// Authorizes an administrative change to a worker (firing, editing).
///
/// # Errors
///
/// Returns `CoreError::Forbidden` unless the scope administers the worker's
/// home shop.
pub fn authorize_worker_admin(
    scope: &Scope,
    worker: &Worker,
    action: &str,
) -> Result<(), CoreError> {
    if manages_worker(scope, worker) {
        Ok(())
    } else {
        Err(CoreError::forbidden(
            action,
            "requires an admin of the worker's shop",
        ))
    }
}

/// Authorizes moving a worker to `shop_id`.
///
/// The scope must administer the target shop, and also the worker's current
/// home shop when there is one.
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if either check fails.
pub fn authorize_assignment(scope: &Scope, worker: &Worker, shop_id: i64) -> Result<(), CoreError> {
    require_shop_admin(scope, shop_id, "assign worker")?;

    if let Some(current) = worker.home_shop_id
        && !scope.manages_shop(current)
    {
        return Err(CoreError::forbidden(
            "assign worker",
            "worker belongs to a shop you do not manage",
        ));
    }

    Ok(())
}
