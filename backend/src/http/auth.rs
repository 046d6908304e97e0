//! Request guards: editor roles for rule changes, bearer secret for cron calls.

use std::str::FromStr;

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

use super::error::AppError;

/// Header carrying the caller's role.
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin | Role::Editor)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Role named by [`ROLE_HEADER`]. There is no user store yet, so an absent
/// header resolves to `Owner`.
pub fn resolve_role(headers: &HeaderMap) -> Result<Role, AppError> {
    match headers.get(ROLE_HEADER) {
        None => Ok(Role::Owner),
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::BadRequest("role header is not valid text".to_string()))?
            .parse()
            .map_err(AppError::BadRequest),
    }
}

pub fn require_editor(headers: &HeaderMap) -> Result<Role, AppError> {
    let role = resolve_role(headers)?;
    if role.can_edit() {
        Ok(role)
    } else {
        Err(AppError::Forbidden("forbidden".to_string()))
    }
}

/// Check `Authorization: Bearer <secret>` against the configured cron secret.
///
/// Always fails while no secret is configured.
pub fn verify_cron_secret(headers: &HeaderMap, configured: Option<&str>) -> Result<(), AppError> {
    let secret = configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing cron secret".to_string()))?;

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("missing bearer".to_string()))?;

    // Compare fixed-size digests so the check does not leak the secret's length.
    if Sha256::digest(provided.as_bytes()) == Sha256::digest(secret.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("bad secret".to_string()))
    }
}
