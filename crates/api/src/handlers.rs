// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler loads what the core planner needs, runs the pure planning
//! step, applies the result to storage and translates errors at this
//! boundary. Handlers never decide authorization themselves beyond picking
//! which scope check to run.

use std::collections::BTreeSet;
use std::str::FromStr;

use brew_roster::{
    CellEditOutcome, CellEditPlan, DayCoverage, ExchangeTransition, GridInput, GridRow,
    ScheduleGrid, ShiftMutation, authorize_assignment, authorize_vacation, authorize_worker_admin,
    manages_worker, plan_approve, plan_cancel, plan_cell_edit, plan_offer, plan_reject, plan_take,
    require_shop_admin, require_super_admin,
};
use brew_roster_domain::{
    MonthRef, RequestStatus, Scope, Shift, ShiftRequest, ShortCode, Shop, Worker,
    compute_experience_years, reconcile_experience, validate_minimum_workers,
    validate_short_code_addressable, validate_short_code_unique, validate_shop_fields,
    validate_worker_fields,
};
use brew_roster_persistence::{IdentityData, Persistence};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService};
use crate::convert::{
    cell_display, format_date, format_timestamp, parse_date, parse_optional_date, request_info,
    request_infos, shift_info, shop_info, shop_infos, worker_info,
};
use crate::error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AssignShopAdminRequest, AssignShopAdminResponse, AssignWorkerRequest, CellEditRequest,
    CellEditResponse, CreateFirstAdminRequest, CreateFirstAdminResponse, CreateShopRequest,
    DayInfo, FireWorkerRequest, GridRequest, GridResponse, GridRowInfo, ListShiftRequestsResponse,
    ListShopsResponse, ListWorkersResponse, LoginRequest, LoginResponse, OfferShiftRequest,
    RegisterVacationRequest, RegisterWorkerRequest, SelfRegisterRequest, ShiftRequestInfo,
    ShopInfo, UpdateShopRequest, WhoAmIResponse, WorkerInfo,
};
use crate::settings::RosterSettings;

// ========================================================================
// Shared helpers
// ========================================================================

/// Loads the worker record behind a worker scope.
fn acting_worker(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    action: &str,
) -> Result<Worker, ApiError> {
    let worker_id: i64 = actor.worker_id().ok_or_else(|| ApiError::Forbidden {
        action: action.to_string(),
        reason: String::from("only workers can do this"),
    })?;

    persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)
}

/// Brings cached experience years up to date and writes back the changes.
///
/// A failed write is logged; the in-memory values are still correct.
fn resync_experience(persistence: &mut Persistence, workers: &mut [Worker], today: Date) {
    let changes: Vec<(i64, u16)> = reconcile_experience(workers, today);
    if changes.is_empty() {
        return;
    }

    match persistence.update_experience_years(&changes) {
        Ok(rows) => debug!(rows, %today, "Resynchronized experience years"),
        Err(e) => warn!(
            error = %e,
            changed = changes.len(),
            "Failed to persist experience years"
        ),
    }
}

fn validate_login_name(login_name: &str) -> Result<(), ApiError> {
    let trimmed: &str = login_name.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: String::from("Login name must be non-empty and contain no spaces"),
        });
    }
    Ok(())
}

/// Builds an unsaved worker from registration fields.
fn new_worker(
    name: &str,
    contact: Option<&str>,
    experience_start: Option<&str>,
    today: Date,
) -> Result<Worker, ApiError> {
    let start: Option<Date> = parse_optional_date("experience_start", experience_start)?;

    let mut worker: Worker = Worker::new(name.trim().to_string(), start);
    worker.contact = contact
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    worker.experience_years = compute_experience_years(start, today);

    validate_worker_fields(&worker).map_err(translate_domain_error)?;
    Ok(worker)
}

/// Creates a non-superuser identity with a `WORKER` profile.
fn create_worker_identity(
    persistence: &mut Persistence,
    login_name: &str,
    display_name: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<i64, ApiError> {
    let identity_id: i64 = persistence
        .create_identity(login_name, display_name, password, false, now)
        .map_err(translate_persistence_error)?;
    persistence
        .ensure_profile(identity_id)
        .map_err(translate_persistence_error)?;
    Ok(identity_id)
}

fn store_worker(persistence: &mut Persistence, worker: Worker) -> Result<WorkerInfo, ApiError> {
    let worker_id: i64 = persistence
        .create_worker(&worker)
        .map_err(translate_persistence_error)?;
    worker_info(&worker.with_id(worker_id))
}

// ========================================================================
// Authentication
// ========================================================================

/// Logs in and opens a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for unknown logins or wrong passwords.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let (session_token, identity, expires_at): (String, IdentityData, OffsetDateTime) =
        AuthenticationService::login(persistence, &request.login_name, &request.password, now)?;

    Ok(LoginResponse {
        session_token,
        login_name: identity.login_name,
        display_name: identity.display_name,
        expires_at: format_timestamp(expires_at)?,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Validates a session token and resolves the caller's scope.
///
/// # Errors
///
/// Returns `AuthenticationFailed` if the session is invalid or the identity
/// cannot act on anything.
pub fn authenticate(
    persistence: &mut Persistence,
    session_token: &str,
    now: OffsetDateTime,
) -> Result<AuthenticatedActor, ApiError> {
    let identity: IdentityData =
        AuthenticationService::validate_session(persistence, session_token, now)?;
    resolve_role(persistence, &identity)
}

/// Resolves an identity to `SuperAdmin`, `ShopAdmin` or `Worker`.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for a worker identity without a worker
/// record.
pub fn resolve_role(
    persistence: &mut Persistence,
    identity: &IdentityData,
) -> Result<AuthenticatedActor, ApiError> {
    Ok(AuthenticationService::resolve_actor(persistence, identity)?)
}

/// Describes the caller.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor) -> WhoAmIResponse {
    let shop_ids: Vec<i64> = match &actor.scope {
        Scope::ShopAdmin { shop_ids } => shop_ids.iter().copied().collect(),
        Scope::SuperAdmin | Scope::Worker { .. } => Vec::new(),
    };

    WhoAmIResponse {
        identity_id: actor.identity_id,
        login_name: actor.login_name.clone(),
        display_name: actor.display_name.clone(),
        role: actor.scope.label().to_string(),
        shop_ids,
        worker_id: actor.worker_id(),
        unassigned: actor.unassigned,
    }
}

/// Creates the first super admin.
///
/// Only allowed while no identity exists.
///
/// # Errors
///
/// Returns an error if:
/// - Any identity already exists (`Forbidden`)
/// - The login name or password is unacceptable
/// - Database operations fail
pub fn create_first_admin(
    persistence: &mut Persistence,
    request: &CreateFirstAdminRequest,
    now: OffsetDateTime,
) -> Result<CreateFirstAdminResponse, ApiError> {
    let identity_count: i64 = persistence
        .count_identities()
        .map_err(translate_persistence_error)?;

    if identity_count > 0 {
        return Err(AuthError::Unauthorized {
            action: String::from("create_first_admin"),
            required_role: String::from("an empty system"),
        }
        .into());
    }

    validate_login_name(&request.login_name)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let identity_id: i64 = persistence
        .create_identity(
            &request.login_name,
            request.display_name.trim(),
            &request.password,
            true,
            now,
        )
        .map_err(translate_persistence_error)?;

    let identity: IdentityData = persistence
        .get_identity_by_id(identity_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Identity not found after creation"),
        })?;

    info!(identity_id, login_name = %identity.login_name, "Created first super admin");

    Ok(CreateFirstAdminResponse {
        identity_id,
        login_name: identity.login_name,
        display_name: identity.display_name,
        message: String::from("First super admin created successfully"),
    })
}

// ========================================================================
// Shops
// ========================================================================

/// Creates a shop. Super admins only.
///
/// The slug is derived from the name and suffixed until unique.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not a super admin
/// - The name, short code or staffing target is invalid, or the short code
///   would be read as other cell syntax
/// - Another shop uses the short code (`Conflict`)
pub fn create_shop(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    request: &CreateShopRequest,
) -> Result<ShopInfo, ApiError> {
    require_super_admin(&actor.scope, "create shop").map_err(translate_core_error)?;

    let short_code: ShortCode =
        ShortCode::new(&request.short_code).map_err(translate_domain_error)?;
    validate_short_code_addressable(&short_code, &settings.cell_parser)
        .map_err(translate_domain_error)?;
    let minimum_workers: u32 = request
        .minimum_workers
        .map_or(Ok(Shop::DEFAULT_MINIMUM_WORKERS), validate_minimum_workers)
        .map_err(translate_domain_error)?;

    let shop: Shop = Shop::new(request.name.trim(), short_code, minimum_workers);
    validate_shop_fields(&shop).map_err(translate_domain_error)?;

    let existing: Vec<Shop> = persistence
        .list_shops()
        .map_err(translate_persistence_error)?;
    validate_short_code_unique(&shop.short_code, &existing, None)
        .map_err(translate_domain_error)?;

    let created: Shop = persistence
        .create_shop(&shop)
        .map_err(translate_persistence_error)?;

    info!(
        shop_id = created.shop_id(),
        slug = created.slug.value(),
        short_code = created.short_code.value(),
        "Created shop"
    );

    shop_info(&created)
}

/// Edits a shop's name, short code and staffing target.
///
/// # Errors
///
/// Returns an error if the actor does not manage the shop, the shop does not
/// exist, or the new values are invalid.
pub fn update_shop(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    shop_id: i64,
    request: &UpdateShopRequest,
) -> Result<ShopInfo, ApiError> {
    require_shop_admin(&actor.scope, shop_id, "update shop").map_err(translate_core_error)?;

    let current: Shop = persistence
        .get_shop(shop_id)
        .map_err(translate_persistence_error)?;

    let short_code: ShortCode =
        ShortCode::new(&request.short_code).map_err(translate_domain_error)?;
    validate_short_code_addressable(&short_code, &settings.cell_parser)
        .map_err(translate_domain_error)?;
    let minimum_workers: u32 =
        validate_minimum_workers(request.minimum_workers).map_err(translate_domain_error)?;

    let updated: Shop = Shop::with_id(
        shop_id,
        request.name.trim().to_string(),
        short_code,
        current.slug,
        minimum_workers,
    );
    validate_shop_fields(&updated).map_err(translate_domain_error)?;

    let existing: Vec<Shop> = persistence
        .list_shops()
        .map_err(translate_persistence_error)?;
    validate_short_code_unique(&updated.short_code, &existing, Some(shop_id))
        .map_err(translate_domain_error)?;

    persistence
        .update_shop(&updated)
        .map_err(translate_persistence_error)?;

    info!(shop_id, "Updated shop");
    shop_info(&updated)
}

/// Lists all shops by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shops(persistence: &mut Persistence) -> Result<ListShopsResponse, ApiError> {
    let shops: Vec<Shop> = persistence
        .list_shops()
        .map_err(translate_persistence_error)?;
    Ok(ListShopsResponse {
        shops: shop_infos(&shops)?,
    })
}

/// Looks up a shop by slug.
///
/// # Errors
///
/// Returns `ResourceNotFound` for unknown slugs.
pub fn get_shop_by_slug(persistence: &mut Persistence, slug: &str) -> Result<ShopInfo, ApiError> {
    let shop: Shop = persistence
        .get_shop_by_slug(slug)
        .map_err(translate_persistence_error)?;
    shop_info(&shop)
}

/// Deletes a shop. Super admins only.
///
/// # Errors
///
/// Returns `Conflict` while any worker, shift or loan references the shop.
pub fn delete_shop(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shop_id: i64,
) -> Result<(), ApiError> {
    require_super_admin(&actor.scope, "delete shop").map_err(translate_core_error)?;

    persistence
        .delete_shop(shop_id)
        .map_err(translate_persistence_error)?;

    info!(shop_id, "Deleted shop");
    Ok(())
}

// ========================================================================
// Schedule grid & cell edits
// ========================================================================

fn grid_row_info(row: &GridRow, shops: &[Shop]) -> Result<GridRowInfo, ApiError> {
    let cells: Vec<Option<_>> = row
        .cells
        .iter()
        .map(|cell| cell.as_ref().map(|shift| shift_info(shift, shops)).transpose())
        .collect::<Result<_, _>>()?;

    Ok(GridRowInfo {
        worker_id: row.worker.worker_id().ok_or_else(|| ApiError::Internal {
            message: String::from("grid worker has no id"),
        })?,
        name: row.worker.name.clone(),
        experience_years: row.worker.experience_years,
        loaned_in: row.loaned_in,
        cells,
    })
}

fn grid_response(grid: &ScheduleGrid) -> Result<GridResponse, ApiError> {
    Ok(GridResponse {
        shop: shop_info(&grid.shop)?,
        month: grid.month.to_string(),
        previous: grid.previous.to_string(),
        next: grid.next.to_string(),
        dates: grid.dates.iter().copied().map(format_date).collect(),
        rows: grid
            .rows
            .iter()
            .map(|row| grid_row_info(row, &grid.shops))
            .collect::<Result<_, _>>()?,
        days: grid
            .days
            .iter()
            .map(|day: &DayCoverage| DayInfo {
                date: format_date(day.date),
                coverage: day.coverage,
                understaffed: day.understaffed,
            })
            .collect(),
        shops: shop_infos(&grid.shops)?,
    })
}

/// Builds one shop's monthly schedule grid.
///
/// Any authenticated caller may view any shop. Experience years of the
/// displayed workers are resynchronized as a side effect.
///
/// # Errors
///
/// Returns an error if the month is invalid, the shop does not exist, or a
/// query fails.
pub fn build_grid(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    request: &GridRequest,
    now: OffsetDateTime,
) -> Result<GridResponse, ApiError> {
    let month: MonthRef =
        MonthRef::new(request.year, request.month).map_err(translate_domain_error)?;
    let first_day: Date = month.first_day().map_err(translate_domain_error)?;
    let last_day: Date = month.last_day().map_err(translate_domain_error)?;

    let shop: Shop = persistence
        .get_shop(request.shop_id)
        .map_err(translate_persistence_error)?;
    let shops: Vec<Shop> = persistence
        .list_shops()
        .map_err(translate_persistence_error)?;
    let home_workers: Vec<Worker> = persistence
        .list_workers_for_shop(request.shop_id)
        .map_err(translate_persistence_error)?;
    let owned_shifts: Vec<Shift> = persistence
        .list_owned_shifts(request.shop_id, first_day, last_day)
        .map_err(translate_persistence_error)?;
    let loaned_in_shifts: Vec<Shift> = persistence
        .list_loaned_in_shifts(request.shop_id, first_day, last_day)
        .map_err(translate_persistence_error)?;

    let visitor_ids: Vec<i64> = loaned_in_shifts
        .iter()
        .map(|shift| shift.worker_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();
    let loaned_in_workers: Vec<Worker> = persistence
        .list_workers_by_ids(&visitor_ids)
        .map_err(translate_persistence_error)?;

    let mut grid: ScheduleGrid = brew_roster::build_grid(GridInput {
        shop,
        month,
        home_workers,
        loaned_in_workers,
        owned_shifts,
        loaned_in_shifts,
        shops,
    })
    .map_err(translate_core_error)?;

    let mut shown: Vec<Worker> = grid.rows.iter().map(|row| row.worker.clone()).collect();
    resync_experience(persistence, &mut shown, settings.today(now)?);
    for (row, worker) in grid.rows.iter_mut().zip(shown) {
        row.worker = worker;
    }

    debug!(
        identity_id = actor.identity_id,
        shop_id = request.shop_id,
        %month,
        rows = grid.rows.len(),
        "Built schedule grid"
    );

    grid_response(&grid)
}

/// Applies one free-text schedule-cell edit.
///
/// # Errors
///
/// Returns an error if:
/// - The text does not parse (`ParseError`)
/// - The worker or shop does not exist (`ResourceNotFound`)
/// - The actor does not administer the shop, or the worker belongs to
///   another shop (`Forbidden`)
/// - A loan names the worker's own shop (`InvalidOperation`)
pub fn apply_cell_edit(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    request: &CellEditRequest,
) -> Result<CellEditResponse, ApiError> {
    let date: Date = parse_date("date", &request.date)?;
    let shops: Vec<Shop> = persistence
        .list_shops()
        .map_err(translate_persistence_error)?;
    let worker: Worker = persistence
        .get_worker(request.worker_id)
        .map_err(translate_persistence_error)?;

    let plan: CellEditPlan = plan_cell_edit(
        &actor.scope,
        &settings.cell_parser,
        &shops,
        &worker,
        request.shop_id,
        date,
        &request.value,
    )
    .map_err(translate_core_error)?;

    let outcome: CellEditOutcome = persistence
        .apply_shift_mutation(&plan)
        .map_err(translate_persistence_error)?;

    let display: String = match &plan.mutation {
        ShiftMutation::Clear => String::new(),
        ShiftMutation::Upsert(kind) => cell_display(kind, &shops)?,
    };

    info!(
        identity_id = actor.identity_id,
        worker_id = plan.worker_id,
        shop_id = plan.shop_id,
        %date,
        kind = plan.kind_name(),
        outcome = outcome.as_str(),
        "Applied cell edit"
    );

    Ok(CellEditResponse {
        worker_id: plan.worker_id,
        date: format_date(date),
        kind: plan.kind_name().to_string(),
        outcome: outcome.as_str().to_string(),
        display,
    })
}

// ========================================================================
// Shift exchange
// ========================================================================

fn reload_request(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<ShiftRequestInfo, ApiError> {
    let stored: ShiftRequest = persistence
        .get_shift_request(request_id)
        .map_err(translate_persistence_error)?;
    request_info(&stored)
}

fn apply_transition(
    persistence: &mut Persistence,
    transition: &ExchangeTransition,
    request_id: i64,
) -> Result<ShiftRequestInfo, ApiError> {
    persistence
        .apply_exchange_transition(transition)
        .map_err(translate_persistence_error)?;

    info!(
        request_id,
        status = transition.request.status.as_str(),
        reassigned = transition.reassignment.is_some(),
        "Applied exchange transition"
    );

    reload_request(persistence, request_id)
}

/// Offers the caller's shift for exchange.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not the shift's assigned worker (`Forbidden`)
/// - The shift already has a pending request (`Conflict`)
/// - The shift does not exist (`ResourceNotFound`)
pub fn offer_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &OfferShiftRequest,
    now: OffsetDateTime,
) -> Result<ShiftRequestInfo, ApiError> {
    let worker: Worker = acting_worker(persistence, actor, "offer shift")?;
    let shift: Shift = persistence
        .get_shift(request.shift_id)
        .map_err(translate_persistence_error)?;
    let pending_exists: bool = persistence
        .has_pending_request(request.shift_id)
        .map_err(translate_persistence_error)?;

    let offer: ShiftRequest = plan_offer(
        &actor.scope,
        &worker,
        &shift,
        pending_exists,
        &request.reason,
        now,
    )
    .map_err(translate_core_error)?;

    let request_id: i64 = persistence
        .insert_shift_request(&offer)
        .map_err(translate_persistence_error)?;

    info!(
        request_id,
        shift_id = request.shift_id,
        offered_by = offer.offered_by,
        "Offered shift"
    );

    reload_request(persistence, request_id)
}

/// Volunteers the caller for a pending request. A later claim replaces an
/// earlier one.
///
/// # Errors
///
/// Returns `ResourceNotFound`, `Conflict` if the request is resolved, or
/// `InvalidOperation` when the offering worker or a worker from another
/// shop tries to take it.
pub fn take_shift(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request_id: i64,
    now: OffsetDateTime,
) -> Result<ShiftRequestInfo, ApiError> {
    let worker: Worker = acting_worker(persistence, actor, "take shift")?;
    let current: ShiftRequest = persistence
        .get_shift_request(request_id)
        .map_err(translate_persistence_error)?;
    let shift: Shift = persistence
        .get_shift(current.shift_id)
        .map_err(translate_persistence_error)?;

    let claimed: ShiftRequest =
        plan_take(&actor.scope, &worker, &current, &shift, now).map_err(translate_core_error)?;

    apply_transition(
        persistence,
        &ExchangeTransition {
            request: claimed,
            reassignment: None,
        },
        request_id,
    )
}

/// Approves a request and hands the shift to the claimant.
///
/// # Errors
///
/// Returns an error if:
/// - The caller does not administer the shift's shop (`Forbidden`)
/// - The request is resolved or lost a race (`Conflict`)
/// - Nobody claimed it, the claimant left the shift's shop, or the claimant
///   already works that day (`InvalidOperation`)
pub fn approve_shift_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request_id: i64,
    now: OffsetDateTime,
) -> Result<ShiftRequestInfo, ApiError> {
    let current: ShiftRequest = persistence
        .get_shift_request(request_id)
        .map_err(translate_persistence_error)?;
    let shift: Shift = persistence
        .get_shift(current.shift_id)
        .map_err(translate_persistence_error)?;

    let (claimant_home_shop_id, claimant_busy): (Option<i64>, bool) = match current.taken_by {
        Some(claimant) => {
            let home: Option<i64> = persistence
                .get_worker(claimant)
                .map_err(translate_persistence_error)?
                .home_shop_id;
            let busy: bool = persistence
                .find_shift_for_worker_on(claimant, shift.date)
                .map_err(translate_persistence_error)?
                .is_some();
            (home, busy)
        }
        None => (None, false),
    };

    let transition: ExchangeTransition = plan_approve(
        &actor.scope,
        actor.identity_id,
        &current,
        &shift,
        claimant_home_shop_id,
        claimant_busy,
        now,
    )
    .map_err(translate_core_error)?;

    apply_transition(persistence, &transition, request_id)
}

/// Rejects a pending request.
///
/// # Errors
///
/// Returns `Forbidden` if the caller does not administer the shift's shop
/// and `Conflict` if the request is resolved.
pub fn reject_shift_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request_id: i64,
    now: OffsetDateTime,
) -> Result<ShiftRequestInfo, ApiError> {
    let current: ShiftRequest = persistence
        .get_shift_request(request_id)
        .map_err(translate_persistence_error)?;
    let shift: Shift = persistence
        .get_shift(current.shift_id)
        .map_err(translate_persistence_error)?;

    let transition: ExchangeTransition =
        plan_reject(&actor.scope, actor.identity_id, &current, &shift, now)
            .map_err(translate_core_error)?;

    apply_transition(persistence, &transition, request_id)
}

/// Withdraws the caller's own pending request.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller offered the shift and `Conflict`
/// if the request is resolved.
pub fn cancel_shift_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request_id: i64,
) -> Result<ShiftRequestInfo, ApiError> {
    let worker: Worker = acting_worker(persistence, actor, "cancel shift request")?;
    let current: ShiftRequest = persistence
        .get_shift_request(request_id)
        .map_err(translate_persistence_error)?;

    let transition: ExchangeTransition =
        plan_cancel(&actor.scope, &worker, &current).map_err(translate_core_error)?;

    apply_transition(persistence, &transition, request_id)
}

/// Lists a shop's requests, optionally filtered by lowercase status.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller administers the shop and
/// `InvalidInput` for an unknown status.
pub fn list_shift_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    shop_id: i64,
    status: Option<&str>,
) -> Result<ListShiftRequestsResponse, ApiError> {
    require_shop_admin(&actor.scope, shop_id, "list shift requests")
        .map_err(translate_core_error)?;

    let status: Option<RequestStatus> = status
        .map(|s| RequestStatus::from_str(s.trim()))
        .transpose()
        .map_err(translate_domain_error)?;

    let requests: Vec<ShiftRequest> = persistence
        .list_requests_for_shop(shop_id, status)
        .map_err(translate_persistence_error)?;

    Ok(ListShiftRequestsResponse {
        requests: request_infos(&requests)?,
    })
}

/// Lists requests the calling worker offered plus pending ones they could
/// take.
///
/// # Errors
///
/// Returns `Forbidden` for non-worker callers.
pub fn list_my_shift_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListShiftRequestsResponse, ApiError> {
    let worker_id: i64 = actor.worker_id().ok_or_else(|| ApiError::Forbidden {
        action: String::from("list my shift requests"),
        reason: String::from("only workers have their own requests"),
    })?;
    let home_shop_id: Option<i64> = persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)?
        .home_shop_id;

    let requests: Vec<ShiftRequest> = persistence
        .list_requests_for_worker(worker_id, home_shop_id)
        .map_err(translate_persistence_error)?;

    Ok(ListShiftRequestsResponse {
        requests: request_infos(&requests)?,
    })
}

// ========================================================================
// Workers & shop admins
// ========================================================================

/// Registers a worker with a login in a shop the caller administers.
///
/// # Errors
///
/// Returns an error if:
/// - The caller does not administer the shop (`Forbidden`)
/// - The shop does not exist (`ResourceNotFound`)
/// - Any field or the password is invalid
/// - The login name is taken (`Conflict`)
pub fn register_worker(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    request: &RegisterWorkerRequest,
    now: OffsetDateTime,
) -> Result<WorkerInfo, ApiError> {
    require_shop_admin(&actor.scope, request.shop_id, "register worker")
        .map_err(translate_core_error)?;
    persistence
        .get_shop(request.shop_id)
        .map_err(translate_persistence_error)?;

    let mut worker: Worker = new_worker(
        &request.name,
        request.contact.as_deref(),
        request.experience_start.as_deref(),
        settings.today(now)?,
    )?;
    worker.home_shop_id = Some(request.shop_id);

    validate_login_name(&request.login_name)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &worker.name,
    )?;

    let identity_id: i64 = create_worker_identity(
        persistence,
        &request.login_name,
        &worker.name,
        &request.password,
        now,
    )?;
    worker.identity_id = Some(identity_id);

    let info: WorkerInfo = store_worker(persistence, worker)?;
    info!(
        worker_id = info.worker_id,
        shop_id = request.shop_id,
        identity_id,
        "Registered worker"
    );
    Ok(info)
}

/// Signs up a worker with no home shop.
///
/// The worker can log in but takes no part in exchanges until an admin
/// assigns a shop.
///
/// # Errors
///
/// Returns an error if any field or the password is invalid, or the login
/// name is taken.
pub fn self_register(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    request: &SelfRegisterRequest,
    now: OffsetDateTime,
) -> Result<WorkerInfo, ApiError> {
    let mut worker: Worker = new_worker(
        &request.name,
        request.contact.as_deref(),
        request.experience_start.as_deref(),
        settings.today(now)?,
    )?;

    validate_login_name(&request.login_name)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &worker.name,
    )?;

    let identity_id: i64 = create_worker_identity(
        persistence,
        &request.login_name,
        &worker.name,
        &request.password,
        now,
    )?;
    worker.identity_id = Some(identity_id);

    let info: WorkerInfo = store_worker(persistence, worker)?;
    info!(worker_id = info.worker_id, identity_id, "Self-registered worker");
    Ok(info)
}

/// Moves a worker to a shop.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller administers the target shop and the
/// worker's current shop, and `ResourceNotFound` for unknown ids.
pub fn assign_worker_to_shop(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    worker_id: i64,
    request: &AssignWorkerRequest,
) -> Result<WorkerInfo, ApiError> {
    let mut worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)?;

    authorize_assignment(&actor.scope, &worker, request.shop_id).map_err(translate_core_error)?;
    persistence
        .get_shop(request.shop_id)
        .map_err(translate_persistence_error)?;

    let previous: Option<i64> = worker.home_shop_id;
    worker.home_shop_id = Some(request.shop_id);
    persistence
        .update_worker(&worker)
        .map_err(translate_persistence_error)?;

    info!(
        worker_id,
        from_shop = previous,
        to_shop = request.shop_id,
        "Assigned worker to shop"
    );
    worker_info(&worker)
}

/// Sets a worker's vacation start.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller is the worker or administers their
/// shop.
pub fn register_vacation(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    worker_id: i64,
    request: &RegisterVacationRequest,
) -> Result<WorkerInfo, ApiError> {
    let mut worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)?;

    authorize_vacation(&actor.scope, &worker).map_err(translate_core_error)?;

    let start_date: Date = parse_date("start_date", &request.start_date)?;
    worker.vacation_start = Some(start_date);
    persistence
        .update_worker(&worker)
        .map_err(translate_persistence_error)?;

    info!(worker_id, %start_date, "Registered vacation");
    worker_info(&worker)
}

/// Records a worker's termination date.
///
/// The worker stays on grids for months starting before that date.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller administers the worker's shop.
pub fn fire_worker(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    worker_id: i64,
    request: &FireWorkerRequest,
) -> Result<WorkerInfo, ApiError> {
    let mut worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)?;

    authorize_worker_admin(&actor.scope, &worker, "fire worker").map_err(translate_core_error)?;

    let fired_at: Date = parse_date("fired_at", &request.fired_at)?;
    worker.fired_at = Some(fired_at);
    persistence
        .update_worker(&worker)
        .map_err(translate_persistence_error)?;

    info!(worker_id, %fired_at, "Fired worker");
    worker_info(&worker)
}

/// Lists a shop's workers with up-to-date experience years.
///
/// # Errors
///
/// Returns `Forbidden` unless the caller administers the shop.
pub fn list_workers(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    shop_id: i64,
    now: OffsetDateTime,
) -> Result<ListWorkersResponse, ApiError> {
    require_shop_admin(&actor.scope, shop_id, "list workers").map_err(translate_core_error)?;
    persistence
        .get_shop(shop_id)
        .map_err(translate_persistence_error)?;

    let mut workers: Vec<Worker> = persistence
        .list_workers_for_shop(shop_id)
        .map_err(translate_persistence_error)?;
    resync_experience(persistence, &mut workers, settings.today(now)?);

    Ok(ListWorkersResponse {
        shop_id: Some(shop_id),
        workers: workers.iter().map(worker_info).collect::<Result<_, _>>()?,
    })
}

/// Lists workers waiting for a home shop. Super admins only.
///
/// # Errors
///
/// Returns `Forbidden` for any other scope.
pub fn list_unassigned_workers(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<ListWorkersResponse, ApiError> {
    require_super_admin(&actor.scope, "list unassigned workers").map_err(translate_core_error)?;

    let mut workers: Vec<Worker> = persistence
        .list_unassigned_workers()
        .map_err(translate_persistence_error)?;
    resync_experience(persistence, &mut workers, settings.today(now)?);

    Ok(ListWorkersResponse {
        shop_id: None,
        workers: workers.iter().map(worker_info).collect::<Result<_, _>>()?,
    })
}

/// Returns one worker with up-to-date experience years.
///
/// Visible to the worker themself and to admins of their shop.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `Forbidden`.
pub fn get_worker(
    persistence: &mut Persistence,
    settings: &RosterSettings,
    actor: &AuthenticatedActor,
    worker_id: i64,
    now: OffsetDateTime,
) -> Result<WorkerInfo, ApiError> {
    let mut worker: Worker = persistence
        .get_worker(worker_id)
        .map_err(translate_persistence_error)?;

    let is_self: bool = actor.worker_id() == Some(worker_id);
    if !is_self && !manages_worker(&actor.scope, &worker) {
        return Err(ApiError::Forbidden {
            action: String::from("view worker"),
            reason: String::from("only the worker or an admin of their shop may do this"),
        });
    }

    resync_experience(
        persistence,
        std::slice::from_mut(&mut worker),
        settings.today(now)?,
    );
    worker_info(&worker)
}

/// Makes an identity an admin of a shop. Super admins only.
///
/// # Errors
///
/// Returns `Forbidden` for other scopes and `ResourceNotFound` for unknown
/// logins or shops.
pub fn assign_shop_admin(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &AssignShopAdminRequest,
) -> Result<AssignShopAdminResponse, ApiError> {
    require_super_admin(&actor.scope, "assign shop admin").map_err(translate_core_error)?;

    let identity: IdentityData = persistence
        .get_identity_by_login(&request.login_name)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Identity"),
            message: format!("No login named '{}'", request.login_name),
        })?;
    let shop: Shop = persistence
        .get_shop(request.shop_id)
        .map_err(translate_persistence_error)?;

    persistence
        .add_shop_admin(identity.identity_id, request.shop_id)
        .map_err(translate_persistence_error)?;

    info!(
        identity_id = identity.identity_id,
        shop_id = request.shop_id,
        "Assigned shop admin"
    );

    Ok(AssignShopAdminResponse {
        identity_id: identity.identity_id,
        shop_id: request.shop_id,
        message: format!("{} now manages {}", identity.display_name, shop.name),
    })
}
