// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity, session, profile and shop-admin mutations.

use brew_roster_domain::ProfileRole;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::columns::format_timestamp;
use crate::diesel_schema::{identities, sessions, shop_admins, user_profiles};
use crate::error::PersistenceError;
use crate::queries::identities::normalize_login;

backend_fn! {
/// Creates a login identity and returns its ID.
///
/// The login name is normalized to lowercase and the password is hashed
/// with bcrypt.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the login name is taken.
pub fn create_identity(
    conn: &mut _,
    login_name: &str,
    display_name: &str,
    password: &str,
    is_superuser: bool,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = normalize_login(login_name);

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(identities::table)
        .values((
            identities::login_name.eq(&normalized_login),
            identities::display_name.eq(display_name.trim()),
            identities::password_hash.eq(&password_hash),
            identities::is_superuser.eq(i32::from(is_superuser)),
            identities::created_at.eq(format_timestamp(now)?),
        ))
        .execute(conn)?;

    let identity_id: i64 = conn.get_last_insert_rowid()?;
    info!(identity_id, login_name = %normalized_login, is_superuser, "Created identity");
    Ok(identity_id)
}
}

backend_fn! {
/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(
    conn: &mut _,
    identity_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(identities::table)
        .filter(identities::identity_id.eq(identity_id))
        .set(identities::last_login_at.eq(Some(format_timestamp(now)?)))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Creates a session and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    identity_id: i64,
    now: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let now_text: String = format_timestamp(now)?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::identity_id.eq(identity_id),
            sessions::created_at.eq(&now_text),
            sessions::last_activity_at.eq(&now_text),
            sessions::expires_at.eq(format_timestamp(expires_at)?),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, identity_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp of a session.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut _,
    session_id: i64,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(format_timestamp(now)?))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes every session that expired before `now`.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut _,
    now: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(format_timestamp(now)?))
        .execute(conn)?;

    if rows_affected > 0 {
        info!(rows_affected, "Deleted expired sessions");
    }
    Ok(rows_affected)
}
}

backend_fn! {
/// Returns the identity's profile role, creating a `WORKER` profile first
/// if none exists.
///
/// # Errors
///
/// Returns an error if the query or insert fails, or the stored role is
/// unknown.
pub fn ensure_profile(conn: &mut _, identity_id: i64) -> Result<ProfileRole, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let role: Option<String> = user_profiles::table
            .filter(user_profiles::identity_id.eq(identity_id))
            .select(user_profiles::role)
            .first(conn)
            .optional()?;

        if let Some(role) = role {
            return Ok(role.parse::<ProfileRole>()?);
        }

        diesel::insert_into(user_profiles::table)
            .values((
                user_profiles::identity_id.eq(identity_id),
                user_profiles::role.eq(ProfileRole::Worker.as_str()),
            ))
            .execute(conn)?;

        info!(identity_id, "Created missing profile with role WORKER");
        Ok(ProfileRole::Worker)
    })
}
}

backend_fn! {
/// Grants an identity administration of a shop and promotes its profile
/// to `SHOP_ADMIN`. Granting an existing assignment again is a no-op.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the identity or shop
/// does not exist.
pub fn add_shop_admin(
    conn: &mut _,
    identity_id: i64,
    shop_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let already: i64 = shop_admins::table
            .filter(shop_admins::identity_id.eq(identity_id))
            .filter(shop_admins::shop_id.eq(shop_id))
            .count()
            .get_result(conn)?;

        if already == 0 {
            diesel::insert_into(shop_admins::table)
                .values((
                    shop_admins::identity_id.eq(identity_id),
                    shop_admins::shop_id.eq(shop_id),
                ))
                .execute(conn)?;
        }

        let has_profile: i64 = user_profiles::table
            .filter(user_profiles::identity_id.eq(identity_id))
            .count()
            .get_result(conn)?;

        if has_profile == 0 {
            diesel::insert_into(user_profiles::table)
                .values((
                    user_profiles::identity_id.eq(identity_id),
                    user_profiles::role.eq(ProfileRole::ShopAdmin.as_str()),
                ))
                .execute(conn)?;
        } else {
            diesel::update(user_profiles::table)
                .filter(user_profiles::identity_id.eq(identity_id))
                .set(user_profiles::role.eq(ProfileRole::ShopAdmin.as_str()))
                .execute(conn)?;
        }

        info!(identity_id, shop_id, "Assigned shop admin");
        Ok(())
    })
}
}
