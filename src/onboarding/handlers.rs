use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;

use super::model::ProviderFields;
use super::services::ProviderOnboarding;
use crate::auth::jwt::AuthUser;
use crate::{error::OnboardingError, providers::repo_types::Provider, state::AppState};

pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route("/providers/setup", post(complete_provider_setup))
        .route("/providers/setup-token", post(reissue_setup_token))
}

/// Body of `POST /providers/setup`.
#[derive(Debug, Deserialize)]
pub struct ProviderSetupRequest {
    #[serde(default)]
    pub token: String,
    #[serde(flatten)]
    pub fields: ProviderFields,
    pub photo_reference: Option<String>,
}

/// Body returned by `POST /providers/setup-token`.
#[derive(Debug, Serialize)]
pub struct SetupTokenResponse {
    pub provider_setup_token: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

#[instrument(skip(onboarding), fields(user_id = %user_id))]
pub async fn reissue_setup_token(
    State(onboarding): State<ProviderOnboarding>,
    AuthUser(user_id): AuthUser,
) -> Result<(StatusCode, Json<SetupTokenResponse>), OnboardingError> {
    let record = onboarding.reissue_setup_token(user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(SetupTokenResponse {
            provider_setup_token: record.token,
            expires_at: record.expires_at,
        }),
    ))
}

#[instrument(skip(onboarding, payload))]
pub async fn complete_provider_setup(
    State(onboarding): State<ProviderOnboarding>,
    Json(payload): Json<ProviderSetupRequest>,
) -> Result<(StatusCode, Json<Provider>), OnboardingError> {
    let provider = onboarding
        .complete_provider_setup(&payload.token, payload.fields, payload.photo_reference)
        .await?;
    Ok((StatusCode::CREATED, Json(provider)))
}
