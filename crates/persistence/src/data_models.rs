// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A stored login identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityData {
    pub identity_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored login session.
///
/// Timestamps use the fixed-width UTC column format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub identity_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}
