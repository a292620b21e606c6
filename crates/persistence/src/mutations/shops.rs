// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shop mutations.

use brew_roster_domain::{Shop, Slug};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::shops;
use crate::error::PersistenceError;
use crate::queries::shops::{
    is_shop_referenced_mysql, is_shop_referenced_sqlite, slug_exists_mysql, slug_exists_sqlite,
};

fn minimum_workers_column(shop: &Shop) -> Result<i32, PersistenceError> {
    shop.minimum_workers.to_i32().ok_or_else(|| {
        PersistenceError::Other(format!(
            "minimum_workers {} does not fit the column",
            shop.minimum_workers
        ))
    })
}

/// Creates a shop (`SQLite` version).
///
/// The slug derived from the name is made unique by appending `-2`, `-3`, …
/// as needed. Returns the stored shop with its ID and final slug.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the short code is taken.
pub fn create_shop_sqlite(
    conn: &mut SqliteConnection,
    shop: &Shop,
) -> Result<Shop, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut slug: Slug = shop.slug.clone();
        let mut suffix: u32 = 2;
        while slug_exists_sqlite(conn, slug.value())? {
            slug = shop.slug.with_suffix(suffix);
            suffix += 1;
        }
        insert_shop_sqlite(conn, shop, &slug)
    })
}

/// Creates a shop (`MySQL` version).
///
/// The slug derived from the name is made unique by appending `-2`, `-3`, …
/// as needed. Returns the stored shop with its ID and final slug.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the short code is taken.
pub fn create_shop_mysql(
    conn: &mut MysqlConnection,
    shop: &Shop,
) -> Result<Shop, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut slug: Slug = shop.slug.clone();
        let mut suffix: u32 = 2;
        while slug_exists_mysql(conn, slug.value())? {
            slug = shop.slug.with_suffix(suffix);
            suffix += 1;
        }
        insert_shop_mysql(conn, shop, &slug)
    })
}

backend_fn! {
fn insert_shop(conn: &mut _, shop: &Shop, slug: &Slug) -> Result<Shop, PersistenceError> {
    diesel::insert_into(shops::table)
        .values((
            shops::name.eq(shop.name.trim()),
            shops::short_code.eq(shop.short_code.value()),
            shops::slug.eq(slug.value()),
            shops::minimum_workers.eq(minimum_workers_column(shop)?),
        ))
        .execute(conn)?;

    let shop_id: i64 = conn.get_last_insert_rowid()?;
    info!(shop_id, short_code = %shop.short_code, slug = slug.value(), "Created shop");

    Ok(Shop::with_id(
        shop_id,
        shop.name.trim().to_string(),
        shop.short_code.clone(),
        slug.clone(),
        shop.minimum_workers,
    ))
}
}

backend_fn! {
/// Updates a shop's name, short code and staffing target. The slug is kept.
///
/// # Errors
///
/// Returns `PersistenceError::ShopNotFound` if the shop does not exist, or
/// `PersistenceError::UniqueViolation` if the short code is taken.
pub fn update_shop(conn: &mut _, shop: &Shop) -> Result<(), PersistenceError> {
    let shop_id: i64 = shop
        .shop_id()
        .ok_or_else(|| PersistenceError::Other(String::from("Cannot update an unsaved shop")))?;

    let rows_affected: usize = diesel::update(shops::table)
        .filter(shops::shop_id.eq(shop_id))
        .set((
            shops::name.eq(shop.name.trim()),
            shops::short_code.eq(shop.short_code.value()),
            shops::minimum_workers.eq(minimum_workers_column(shop)?),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ShopNotFound(shop_id.to_string()));
    }

    info!(shop_id, "Updated shop");
    Ok(())
}
}

/// Deletes a shop that no worker or shift references (`SQLite` version).
///
/// # Errors
///
/// Returns `PersistenceError::ShopReferenced` while references remain, or
/// `PersistenceError::ShopNotFound` if the shop does not exist.
pub fn delete_shop_sqlite(
    conn: &mut SqliteConnection,
    shop_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if is_shop_referenced_sqlite(conn, shop_id)? {
            return Err(PersistenceError::ShopReferenced { shop_id });
        }
        remove_shop_sqlite(conn, shop_id)
    })
}

/// Deletes a shop that no worker or shift references (`MySQL` version).
///
/// # Errors
///
/// Returns `PersistenceError::ShopReferenced` while references remain, or
/// `PersistenceError::ShopNotFound` if the shop does not exist.
pub fn delete_shop_mysql(conn: &mut MysqlConnection, shop_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if is_shop_referenced_mysql(conn, shop_id)? {
            return Err(PersistenceError::ShopReferenced { shop_id });
        }
        remove_shop_mysql(conn, shop_id)
    })
}

backend_fn! {
fn remove_shop(conn: &mut _, shop_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(shops::table)
        .filter(shops::shop_id.eq(shop_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ShopNotFound(shop_id.to_string()));
    }

    info!(shop_id, "Deleted shop");
    Ok(())
}
}
