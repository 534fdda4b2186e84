use axum::http::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::error;

use super::dto::{AuthResponse, PublicUser};
use super::jwt::JwtKeys;
use super::repo_types::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Sign an access/refresh pair for `user`.
pub(crate) fn issue_session(
    keys: &JwtKeys,
    user: User,
    provider_setup_token: Option<String>,
) -> Result<AuthResponse, (StatusCode, String)> {
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
        provider_setup_token,
    })
}
