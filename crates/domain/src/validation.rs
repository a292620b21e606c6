// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cell::CellParser;
use crate::error::DomainError;
use crate::types::{ShortCode, Shop, Worker};

/// Largest accepted daily staffing target.
pub const MAX_MINIMUM_WORKERS: u32 = 100;

/// Validates a raw staffing target and narrows it to `u32`.
///
/// # Errors
///
/// Returns `DomainError::InvalidMinimumWorkers` if the value is negative or
/// above [`MAX_MINIMUM_WORKERS`].
pub fn validate_minimum_workers(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_MINIMUM_WORKERS)
        .ok_or(DomainError::InvalidMinimumWorkers(value))
}

/// Validates that a shop's basic field constraints are met.
///
/// This does NOT check short-code uniqueness (that requires context).
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or only whitespace
/// - The staffing target is above [`MAX_MINIMUM_WORKERS`]
pub fn validate_shop_fields(shop: &Shop) -> Result<(), DomainError> {
    if shop.name.trim().is_empty() {
        return Err(DomainError::InvalidShopName(String::from(
            "Name cannot be empty",
        )));
    }

    if shop.minimum_workers > MAX_MINIMUM_WORKERS {
        return Err(DomainError::InvalidMinimumWorkers(i64::from(
            shop.minimum_workers,
        )));
    }

    Ok(())
}

/// Validates that a worker's basic field constraints are met.
///
/// # Errors
///
/// Returns an error if the worker's name is empty or only whitespace.
pub fn validate_worker_fields(worker: &Worker) -> Result<(), DomainError> {
    if worker.name.trim().is_empty() {
        return Err(DomainError::InvalidWorkerName(String::from(
            "Name cannot be empty",
        )));
    }

    Ok(())
}

/// Validates that a short code can be typed into a cell as a loan.
///
/// # Errors
///
/// Returns `DomainError::InvalidShortCode` if the parser would read the code
/// as an off word, overtime or a start time.
pub fn validate_short_code_addressable(
    short_code: &ShortCode,
    parser: &CellParser,
) -> Result<(), DomainError> {
    if parser.reserves(short_code.value()) {
        return Err(DomainError::InvalidShortCode {
            short_code: short_code.value().to_string(),
            reason: String::from("short code collides with cell-edit syntax"),
        });
    }

    Ok(())
}

/// Validates that a short code is not used by any other shop.
///
/// # Arguments
///
/// * `short_code` - The code to check
/// * `existing_shops` - All known shops
/// * `exclude_shop_id` - A shop to ignore (the one being edited), if any
///
/// # Errors
///
/// Returns `DomainError::DuplicateShortCode` if another shop uses the code.
pub fn validate_short_code_unique(
    short_code: &ShortCode,
    existing_shops: &[Shop],
    exclude_shop_id: Option<i64>,
) -> Result<(), DomainError> {
    let taken: bool = existing_shops
        .iter()
        .filter(|shop| exclude_shop_id.is_none() || shop.shop_id() != exclude_shop_id)
        .any(|shop| &shop.short_code == short_code);

    if taken {
        return Err(DomainError::DuplicateShortCode(
            short_code.value().to_string(),
        ));
    }

    Ok(())
}
