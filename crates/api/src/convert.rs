// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversions between domain values and API DTOs.

use brew_roster_domain::{Shift, ShiftKind, ShiftRequest, Shop, Worker};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::error::ApiError;
use crate::request_response::{ShiftInfo, ShiftRequestInfo, ShopInfo, WorkerInfo};

fn unsaved(what: &str) -> ApiError {
    ApiError::Internal {
        message: format!("{what} has no id"),
    }
}

/// Parses a `YYYY-MM-DD` request field.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
        }
    })
}

/// Parses an optional date field; blank counts as absent.
pub(crate) fn parse_optional_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Date>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}

pub(crate) fn format_date(date: Date) -> String {
    date.to_string()
}

pub(crate) fn format_time(value: Time) -> Result<String, ApiError> {
    value
        .format(format_description!("[hour]:[minute]"))
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format time: {e}"),
        })
}

pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

pub(crate) fn shop_info(shop: &Shop) -> Result<ShopInfo, ApiError> {
    Ok(ShopInfo {
        shop_id: shop.shop_id().ok_or_else(|| unsaved("shop"))?,
        name: shop.name.clone(),
        short_code: shop.short_code.value().to_string(),
        slug: shop.slug.value().to_string(),
        minimum_workers: shop.minimum_workers,
    })
}

pub(crate) fn shop_infos(shops: &[Shop]) -> Result<Vec<ShopInfo>, ApiError> {
    shops.iter().map(shop_info).collect()
}

pub(crate) fn worker_info(worker: &Worker) -> Result<WorkerInfo, ApiError> {
    Ok(WorkerInfo {
        worker_id: worker.worker_id().ok_or_else(|| unsaved("worker"))?,
        name: worker.name.clone(),
        contact: worker.contact.clone(),
        experience_start: worker.experience_start.map(format_date),
        experience_years: worker.experience_years,
        home_shop_id: worker.home_shop_id,
        fired_at: worker.fired_at.map(format_date),
        vacation_start: worker.vacation_start.map(format_date),
        identity_id: worker.identity_id,
    })
}

/// Renders a shift kind back into the cell text that produces it.
///
/// Loans to a shop missing from `shops` fall back to `#<shop_id>`.
pub(crate) fn cell_display(kind: &ShiftKind, shops: &[Shop]) -> Result<String, ApiError> {
    match kind {
        ShiftKind::Overtime => Ok(String::from("+")),
        ShiftKind::Timed { start } => format_time(*start),
        ShiftKind::Loaned { shop_id } => Ok(shops
            .iter()
            .find(|shop| shop.shop_id() == Some(*shop_id))
            .map_or_else(
                || format!("#{shop_id}"),
                |shop| shop.short_code.value().to_string(),
            )),
    }
}

pub(crate) fn shift_info(shift: &Shift, shops: &[Shop]) -> Result<ShiftInfo, ApiError> {
    let start_time: Option<String> = match shift.kind {
        ShiftKind::Timed { start } => Some(format_time(start)?),
        ShiftKind::Overtime | ShiftKind::Loaned { .. } => None,
    };

    Ok(ShiftInfo {
        shift_id: shift.shift_id().ok_or_else(|| unsaved("shift"))?,
        worker_id: shift.worker_id,
        shop_id: shift.shop_id,
        date: format_date(shift.date),
        kind: shift.kind.name().to_string(),
        start_time,
        loaned_to_shop_id: shift.kind.loaned_to(),
        replacement_worker_id: shift.replacement_worker_id,
        display: cell_display(&shift.kind, shops)?,
    })
}

pub(crate) fn request_info(request: &ShiftRequest) -> Result<ShiftRequestInfo, ApiError> {
    Ok(ShiftRequestInfo {
        request_id: request.request_id().ok_or_else(|| unsaved("shift request"))?,
        shift_id: request.shift_id,
        offered_by: request.offered_by,
        reason: request.reason.clone(),
        status: request.status.as_str().to_string(),
        requested_at: format_timestamp(request.requested_at)?,
        taken_by: request.taken_by,
        taken_at: request.taken_at.map(format_timestamp).transpose()?,
        approved_by: request.approved_by,
        approved_at: request.approved_at.map(format_timestamp).transpose()?,
    })
}

pub(crate) fn request_infos(requests: &[ShiftRequest]) -> Result<Vec<ShiftRequestInfo>, ApiError> {
    requests.iter().map(request_info).collect()
}
