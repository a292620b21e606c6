// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity, session, profile and shop-admin queries.

use std::collections::BTreeSet;

use brew_roster_domain::ProfileRole;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{IdentityData, SessionData};
use crate::diesel_schema::{identities, sessions, shop_admins, user_profiles};
use crate::error::PersistenceError;

/// Diesel Queryable struct for identity rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = identities)]
struct IdentityRow {
    identity_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    is_superuser: i32,
    created_at: String,
    last_login_at: Option<String>,
}

impl From<IdentityRow> for IdentityData {
    fn from(row: IdentityRow) -> Self {
        Self {
            identity_id: row.identity_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            is_superuser: row.is_superuser != 0,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    identity_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Normalizes a login name for case-insensitive lookup and uniqueness.
pub(crate) fn normalize_login(login_name: &str) -> String {
    login_name.trim().to_lowercase()
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}

backend_fn! {
/// Retrieves an identity by login name (case-insensitive).
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if not found.
pub fn get_identity_by_login(
    conn: &mut _,
    login_name: &str,
) -> Result<Option<IdentityData>, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);
    debug!(login_name = %normalized_login, "Looking up identity by login");

    Ok(identities::table
        .filter(identities::login_name.eq(&normalized_login))
        .select(IdentityRow::as_select())
        .first(conn)
        .optional()?
        .map(IdentityData::from))
}
}

backend_fn! {
/// Retrieves an identity by ID.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if not found.
pub fn get_identity_by_id(
    conn: &mut _,
    identity_id: i64,
) -> Result<Option<IdentityData>, PersistenceError> {
    Ok(identities::table
        .filter(identities::identity_id.eq(identity_id))
        .select(IdentityRow::as_select())
        .first(conn)
        .optional()?
        .map(IdentityData::from))
}
}

backend_fn! {
/// Counts stored identities.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_identities(conn: &mut _) -> Result<i64, PersistenceError> {
    Ok(identities::table.count().get_result(conn)?)
}
}

backend_fn! {
/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if not found.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    Ok(sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .map(|row| SessionData {
            session_id: row.session_id,
            session_token: row.session_token,
            identity_id: row.identity_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }))
}
}

backend_fn! {
/// Retrieves the profile role for an identity, if a profile exists.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is unknown.
pub fn get_profile_role(
    conn: &mut _,
    identity_id: i64,
) -> Result<Option<ProfileRole>, PersistenceError> {
    let role: Option<String> = user_profiles::table
        .filter(user_profiles::identity_id.eq(identity_id))
        .select(user_profiles::role)
        .first(conn)
        .optional()?;

    Ok(role.as_deref().map(str::parse::<ProfileRole>).transpose()?)
}
}

backend_fn! {
/// Lists the shops an identity administers.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_admin_shop_ids(
    conn: &mut _,
    identity_id: i64,
) -> Result<BTreeSet<i64>, PersistenceError> {
    let shop_ids: Vec<i64> = shop_admins::table
        .filter(shop_admins::identity_id.eq(identity_id))
        .select(shop_admins::shop_id)
        .load(conn)?;

    Ok(shop_ids.into_iter().collect())
}
}
