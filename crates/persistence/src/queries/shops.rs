// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shop queries.

use brew_roster_domain::{ShortCode, Shop, Slug};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::diesel_schema::{shifts, shops, workers};
use crate::error::PersistenceError;

/// Diesel Queryable struct for shop rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = shops)]
pub(crate) struct ShopRow {
    shop_id: i64,
    name: String,
    short_code: String,
    slug: String,
    minimum_workers: i32,
}

impl TryFrom<ShopRow> for Shop {
    type Error = PersistenceError;

    fn try_from(row: ShopRow) -> Result<Self, Self::Error> {
        let minimum_workers: u32 = row.minimum_workers.to_u32().ok_or_else(|| {
            PersistenceError::CorruptRow(format!(
                "shop {} has negative minimum_workers {}",
                row.shop_id, row.minimum_workers
            ))
        })?;

        Ok(Self::with_id(
            row.shop_id,
            row.name,
            ShortCode::new(&row.short_code)?,
            Slug::from_stored(&row.slug),
            minimum_workers,
        ))
    }
}

backend_fn! {
/// Retrieves a shop by ID.
///
/// # Errors
///
/// Returns `PersistenceError::ShopNotFound` if no such shop exists.
pub fn get_shop(conn: &mut _, shop_id: i64) -> Result<Shop, PersistenceError> {
    debug!(shop_id, "Looking up shop");

    shops::table
        .filter(shops::shop_id.eq(shop_id))
        .select(ShopRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::ShopNotFound(shop_id.to_string()))?
        .try_into()
}
}

backend_fn! {
/// Retrieves a shop by its URL slug.
///
/// # Errors
///
/// Returns `PersistenceError::ShopNotFound` if no shop has this slug.
pub fn get_shop_by_slug(conn: &mut _, slug: &str) -> Result<Shop, PersistenceError> {
    debug!(slug, "Looking up shop by slug");

    shops::table
        .filter(shops::slug.eq(slug))
        .select(ShopRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::ShopNotFound(slug.to_string()))?
        .try_into()
}
}

backend_fn! {
/// Lists every shop ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_shops(conn: &mut _) -> Result<Vec<Shop>, PersistenceError> {
    shops::table
        .order((shops::name.asc(), shops::shop_id.asc()))
        .select(ShopRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Shop::try_from)
        .collect()
}
}

backend_fn! {
/// Returns whether a slug is already taken.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn slug_exists(conn: &mut _, slug: &str) -> Result<bool, PersistenceError> {
    let count: i64 = shops::table
        .filter(shops::slug.eq(slug))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns whether any worker or shift still points at the shop.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_shop_referenced(conn: &mut _, shop_id: i64) -> Result<bool, PersistenceError> {
    let worker_count: i64 = workers::table
        .filter(workers::home_shop_id.eq(shop_id))
        .count()
        .get_result(conn)?;

    if worker_count > 0 {
        return Ok(true);
    }

    let shift_count: i64 = shifts::table
        .filter(
            shifts::shop_id
                .eq(shop_id)
                .or(shifts::another_shop_id.eq(shop_id)),
        )
        .count()
        .get_result(conn)?;

    Ok(shift_count > 0)
}
}
