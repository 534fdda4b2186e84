use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    /// Registering in order to offer services; yields a provider setup token.
    #[serde(default)]
    pub is_provider: bool,
    #[serde(default)]
    pub disclaimer_accepted: bool,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `PATCH /me`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub avatar: Option<String>,
    pub disclaimer_accepted: Option<bool>,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
    /// Only on registration with provider intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_setup_token: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub is_provider: bool,
    pub avatar: Option<String>,
    pub disclaimer_accepted: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            is_provider: u.is_provider,
            avatar: u.avatar,
            disclaimer_accepted: u.disclaimer_accepted,
        }
    }
}
