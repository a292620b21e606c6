// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Brew Roster.
//!
//! Callers authenticate with a session token, which resolves to an
//! [`AuthenticatedActor`] carrying a [`brew_roster_domain::Scope`]. Every
//! handler takes the persistence layer explicitly and returns a DTO or an
//! [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod convert;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod settings;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    apply_cell_edit, approve_shift_request, assign_shop_admin, assign_worker_to_shop,
    authenticate, build_grid, cancel_shift_request, create_first_admin, create_shop, delete_shop,
    fire_worker, get_shop_by_slug, get_worker, list_my_shift_requests, list_shift_requests,
    list_shops, list_unassigned_workers, list_workers, login, logout, offer_shift,
    register_vacation, register_worker, reject_shift_request, resolve_role, self_register,
    take_shift, update_shop, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AssignShopAdminRequest, AssignShopAdminResponse, AssignWorkerRequest, CellEditRequest,
    CellEditResponse, CreateFirstAdminRequest, CreateFirstAdminResponse, CreateShopRequest,
    DayInfo, FireWorkerRequest, GridRequest, GridResponse, GridRowInfo, ListShiftRequestsResponse,
    ListShopsResponse, ListWorkersResponse, LoginRequest, LoginResponse, OfferShiftRequest,
    RegisterVacationRequest, RegisterWorkerRequest, SelfRegisterRequest, ShiftInfo,
    ShiftRequestInfo, ShopInfo, UpdateShopRequest, WhoAmIResponse, WorkerInfo,
};
pub use settings::RosterSettings;
