// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text encodings for date and time columns.
//!
//! Dates are stored as `YYYY-MM-DD`, start times as `HH:MM` and instants as
//! fixed-width UTC `YYYY-MM-DDTHH:MM:SSZ`, so lexical order matches
//! chronological order on every backend.

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::PersistenceError;

pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::Other(format!("Failed to format date: {e}")))
}

pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::CorruptRow(format!("bad date '{value}': {e}")))
}

pub fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, PersistenceError> {
    value.map(parse_date).transpose()
}

pub fn format_optional_date(date: Option<Date>) -> Result<Option<String>, PersistenceError> {
    date.map(format_date).transpose()
}

pub fn format_time(value: Time) -> Result<String, PersistenceError> {
    value
        .format(format_description!("[hour]:[minute]"))
        .map_err(|e| PersistenceError::Other(format!("Failed to format time: {e}")))
}

pub fn parse_time(value: &str) -> Result<Time, PersistenceError> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|e| PersistenceError::CorruptRow(format!("bad time '{value}': {e}")))
}

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"),
    )
    .map(PrimitiveDateTime::assume_utc)
    .map_err(|e| PersistenceError::CorruptRow(format!("bad timestamp '{value}': {e}")))
}

pub fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}
