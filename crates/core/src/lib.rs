// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod access;
mod cell_edit;
mod error;
mod exchange;
mod grid;

#[cfg(test)]
mod tests;

pub use access::{
    authorize_assignment, authorize_vacation, authorize_worker_admin, manages_worker,
    require_assigned_worker, require_shop_admin, require_super_admin,
};
pub use cell_edit::{CellEditOutcome, CellEditPlan, ShiftMutation, plan_cell_edit};
pub use error::CoreError;
pub use exchange::{
    ExchangeTransition, ShiftReassignment, plan_approve, plan_cancel, plan_offer, plan_reject,
    plan_take,
};
pub use grid::{DayCoverage, GridInput, GridRow, ScheduleGrid, build_grid};
