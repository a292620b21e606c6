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

mod calendar;
mod cell;
mod error;
mod experience;
mod request;
mod shift;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{MonthRef, local_date_at, parse_timezone, today_in};
pub use cell::{CellIntent, CellParser};
pub use error::DomainError;
pub use experience::{compute_experience_years, reconcile_experience};
pub use request::{RequestStatus, ShiftRequest};
pub use shift::{Shift, ShiftKind};
pub use types::{ProfileRole, Scope, ShortCode, Shop, Slug, Worker};
pub use validation::{
    MAX_MINIMUM_WORKERS, validate_minimum_workers, validate_short_code_addressable,
    validate_short_code_unique, validate_shop_fields, validate_worker_fields,
};
