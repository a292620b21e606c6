// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` strings, times as `HH:MM` and instants as
//! RFC 3339 UTC strings.

use serde::{Deserialize, Serialize};

// ========================================================================
// Authentication
// ========================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The login name (case-insensitive).
    pub login_name: String,
    /// The plaintext password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for later requests.
    pub session_token: String,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// When the session expires.
    pub expires_at: String,
}

/// API request to create the first super admin on an empty system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateFirstAdminRequest {
    /// The login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The password.
    pub password: String,
    /// The password, repeated.
    pub password_confirmation: String,
}

/// API response for first-admin creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFirstAdminResponse {
    /// The new identity.
    pub identity_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// A success message.
    pub message: String,
}

/// The caller's resolved role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The login identity.
    pub identity_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// `SUPER_ADMIN`, `SHOP_ADMIN` or `WORKER`.
    pub role: String,
    /// Shops a shop admin manages; empty otherwise.
    pub shop_ids: Vec<i64>,
    /// The linked worker for worker identities.
    pub worker_id: Option<i64>,
    /// True for a worker without a home shop.
    pub unassigned: bool,
}

// ========================================================================
// Shops
// ========================================================================

/// API request to create a shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateShopRequest {
    /// The display name.
    pub name: String,
    /// The short code used in cell edits.
    pub short_code: String,
    /// Daily staffing target; defaults to 4.
    pub minimum_workers: Option<i64>,
}

/// API request to edit a shop. The slug never changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateShopRequest {
    /// The display name.
    pub name: String,
    /// The short code used in cell edits.
    pub short_code: String,
    /// Daily staffing target.
    pub minimum_workers: i64,
}

/// A shop as seen by API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInfo {
    /// The canonical identifier.
    pub shop_id: i64,
    /// The display name.
    pub name: String,
    /// The short code.
    pub short_code: String,
    /// The URL-stable slug.
    pub slug: String,
    /// Daily staffing target.
    pub minimum_workers: u32,
}

/// API response listing shops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShopsResponse {
    /// All shops, by name.
    pub shops: Vec<ShopInfo>,
}

// ========================================================================
// Workers
// ========================================================================

/// API request for an admin to register a worker in their shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterWorkerRequest {
    /// The worker's home shop.
    pub shop_id: i64,
    /// The worker's name.
    pub name: String,
    /// Contact details, stored encrypted.
    pub contact: Option<String>,
    /// Experience start date.
    pub experience_start: Option<String>,
    /// The new login name.
    pub login_name: String,
    /// The new password.
    pub password: String,
    /// The password, repeated.
    pub password_confirmation: String,
}

/// API request for a worker to sign up without a shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelfRegisterRequest {
    /// The worker's name.
    pub name: String,
    /// Contact details, stored encrypted.
    pub contact: Option<String>,
    /// Experience start date.
    pub experience_start: Option<String>,
    /// The new login name.
    pub login_name: String,
    /// The new password.
    pub password: String,
    /// The password, repeated.
    pub password_confirmation: String,
}

/// API request to move a worker to a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AssignWorkerRequest {
    /// The new home shop.
    pub shop_id: i64,
}

/// API request to set a worker's vacation start.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterVacationRequest {
    /// First vacation day.
    pub start_date: String,
}

/// API request to terminate a worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FireWorkerRequest {
    /// Termination date.
    pub fired_at: String,
}

/// A worker as seen by API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInfo {
    /// The canonical identifier.
    pub worker_id: i64,
    /// The worker's name.
    pub name: String,
    /// Decrypted contact details.
    pub contact: Option<String>,
    /// Experience start date.
    pub experience_start: Option<String>,
    /// Whole years of experience as of today.
    pub experience_years: u16,
    /// Home shop; absent for unassigned workers.
    pub home_shop_id: Option<i64>,
    /// Termination date.
    pub fired_at: Option<String>,
    /// Vacation start.
    pub vacation_start: Option<String>,
    /// Linked login identity.
    pub identity_id: Option<i64>,
}

/// API response listing workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWorkersResponse {
    /// The shop listed, or `None` for unassigned workers.
    pub shop_id: Option<i64>,
    /// The workers, by name.
    pub workers: Vec<WorkerInfo>,
}

/// API request to make an identity an admin of a shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignShopAdminRequest {
    /// The identity's login name.
    pub login_name: String,
    /// The shop to manage.
    pub shop_id: i64,
}

/// API response for a shop-admin assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignShopAdminResponse {
    /// The promoted identity.
    pub identity_id: i64,
    /// The managed shop.
    pub shop_id: i64,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Schedule grid & cell edits
// ========================================================================

/// API request for one shop's monthly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridRequest {
    /// The shop.
    pub shop_id: i64,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u8,
}

/// A stored shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInfo {
    /// The canonical identifier.
    pub shift_id: i64,
    /// The assigned worker.
    pub worker_id: i64,
    /// The owning shop.
    pub shop_id: i64,
    /// The day.
    pub date: String,
    /// `overtime`, `timed` or `loaned`.
    pub kind: String,
    /// Start time of a timed shift.
    pub start_time: Option<String>,
    /// Target shop of a loan.
    pub loaned_to_shop_id: Option<i64>,
    /// Previous holder after an approved exchange.
    pub replacement_worker_id: Option<i64>,
    /// The cell text that reproduces this shift.
    pub display: String,
}

/// One worker's row in a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRowInfo {
    /// The worker.
    pub worker_id: i64,
    /// The worker's name.
    pub name: String,
    /// Whole years of experience as of today.
    pub experience_years: u16,
    /// Whether the worker is here on loan.
    pub loaned_in: bool,
    /// One entry per day; `None` is a day off.
    pub cells: Vec<Option<ShiftInfo>>,
}

/// Coverage for one day of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    /// The day.
    pub date: String,
    /// Shifts counting toward the shop.
    pub coverage: u32,
    /// Whether coverage is below the shop's target.
    pub understaffed: bool,
}

/// API response for a monthly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridResponse {
    /// The shop shown.
    pub shop: ShopInfo,
    /// The month shown, `YYYY-MM`.
    pub month: String,
    /// The previous month, `YYYY-MM`.
    pub previous: String,
    /// The next month, `YYYY-MM`.
    pub next: String,
    /// Every date of the month.
    pub dates: Vec<String>,
    /// Home roster first, then loaned-in workers.
    pub rows: Vec<GridRowInfo>,
    /// Coverage per date.
    pub days: Vec<DayInfo>,
    /// All shops, for navigation.
    pub shops: Vec<ShopInfo>,
}

/// API request to edit one schedule cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CellEditRequest {
    /// The worker whose row is edited.
    pub worker_id: i64,
    /// The roster being edited.
    pub shop_id: i64,
    /// The day.
    pub date: String,
    /// The raw cell text.
    pub value: String,
}

/// API response for a cell edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEditResponse {
    /// The worker whose row was edited.
    pub worker_id: i64,
    /// The day.
    pub date: String,
    /// `cleared`, `overtime`, `timed` or `loaned`.
    pub kind: String,
    /// `created`, `updated`, `deleted` or `unchanged`.
    pub outcome: String,
    /// The normalized cell text.
    pub display: String,
}

// ========================================================================
// Shift exchange
// ========================================================================

/// API request to offer a shift for exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OfferShiftRequest {
    /// The offered shift.
    pub shift_id: i64,
    /// Why the worker wants to swap.
    #[serde(default)]
    pub reason: String,
}

/// A shift-exchange request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequestInfo {
    /// The canonical identifier.
    pub request_id: i64,
    /// The offered shift.
    pub shift_id: i64,
    /// The offering worker.
    pub offered_by: i64,
    /// Free-text reason.
    pub reason: String,
    /// Lowercase status.
    pub status: String,
    /// When the offer was made.
    pub requested_at: String,
    /// The volunteer, if any.
    pub taken_by: Option<i64>,
    /// When the volunteer claimed it.
    pub taken_at: Option<String>,
    /// The resolving identity.
    pub approved_by: Option<i64>,
    /// When it was approved or rejected.
    pub approved_at: Option<String>,
}

/// API response listing shift-exchange requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShiftRequestsResponse {
    /// The requests, newest first.
    pub requests: Vec<ShiftRequestInfo>,
}
