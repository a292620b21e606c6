// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session authentication and scope resolution.

use std::collections::BTreeSet;

use brew_roster_domain::{ProfileRole, Scope, Worker};
use brew_roster_persistence::{IdentityData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::error::AuthError;

/// An authenticated identity with its resolved scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The login identity.
    pub identity_id: i64,
    /// The normalized login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// What this identity may act on.
    pub scope: Scope,
    /// True for a worker who has no home shop yet.
    pub unassigned: bool,
}

impl AuthenticatedActor {
    /// Returns the acting worker ID for worker scopes.
    #[must_use]
    pub const fn worker_id(&self) -> Option<i64> {
        self.scope.worker_id()
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    pub const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Verifies credentials and opens a session.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `identity`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns an error if the login is unknown, the password is wrong, or
    /// the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(String, IdentityData, OffsetDateTime), AuthError> {
        let identity: IdentityData = persistence
            .get_identity_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid login name or password"),
            })?;

        let valid: bool = persistence
            .verify_password(password, &identity.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid login name or password"),
            });
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = now + Self::DEFAULT_SESSION_EXPIRATION;

        persistence
            .create_session(&session_token, identity.identity_id, now, expires_at)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(identity.identity_id, now)
            .map_err(Self::map_persistence_error)?;

        info!(
            identity_id = identity.identity_id,
            login_name = %identity.login_name,
            "Login succeeded"
        );

        Ok((session_token, identity, expires_at))
    }

    /// Validates a session token and returns its identity.
    ///
    /// Expired sessions are deleted on sight.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or its
    /// identity no longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<IdentityData, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if now > expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let identity: IdentityData = persistence
            .get_identity_by_id(session.identity_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Identity not found"),
            })?;

        persistence
            .update_session_activity(session.session_id, now)
            .map_err(Self::map_persistence_error)?;

        Ok(identity)
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)
    }

    /// Resolves what an identity may act on.
    ///
    /// - A superuser flag yields `SuperAdmin`.
    /// - A `SHOP_ADMIN` profile yields `ShopAdmin` with its shop set.
    /// - Otherwise the identity is a worker and must have a linked worker
    ///   record.
    ///
    /// A missing profile is created with the `WORKER` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for a worker identity with no linked
    /// worker record.
    pub fn resolve_actor(
        persistence: &mut Persistence,
        identity: &IdentityData,
    ) -> Result<AuthenticatedActor, AuthError> {
        let actor = |scope: Scope, unassigned: bool| AuthenticatedActor {
            identity_id: identity.identity_id,
            login_name: identity.login_name.clone(),
            display_name: identity.display_name.clone(),
            scope,
            unassigned,
        };

        if identity.is_superuser {
            return Ok(actor(Scope::SuperAdmin, false));
        }

        let role: ProfileRole = persistence
            .ensure_profile(identity.identity_id)
            .map_err(Self::map_persistence_error)?;

        if role == ProfileRole::ShopAdmin {
            let shop_ids: BTreeSet<i64> = persistence
                .list_admin_shop_ids(identity.identity_id)
                .map_err(Self::map_persistence_error)?;
            return Ok(actor(Scope::ShopAdmin { shop_ids }, false));
        }

        let worker: Worker = persistence
            .get_worker_by_identity(identity.identity_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("'{}' is not linked to a worker", identity.login_name),
            })?;
        let worker_id: i64 = worker.worker_id().ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("linked worker has no id"),
        })?;

        debug!(
            identity_id = identity.identity_id,
            worker_id,
            unassigned = worker.is_unassigned(),
            "Resolved worker scope"
        );

        Ok(actor(Scope::Worker { worker_id }, worker.is_unassigned()))
    }

    /// Generates a session token from 256 random bits.
    fn generate_session_token() -> String {
        (0..4)
            .map(|_| format!("{:016x}", rand::random::<u64>()))
            .collect()
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_are_long_and_distinct() {
        let first = AuthenticationService::generate_session_token();
        let second = AuthenticationService::generate_session_token();

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
