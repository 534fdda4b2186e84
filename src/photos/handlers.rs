use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::services::{ext_from_mime, upload_profile_photo, UploadedPhoto};
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/uploads/photo", post(upload_photo))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

/// POST /uploads/photo (multipart, field `photo`)
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadedPhoto>), (StatusCode, String)> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        if ext_from_mime(&content_type).is_none() {
            warn!(%user_id, %content_type, "unsupported photo type");
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Photo must be jpeg, png, webp or heic".into(),
            ));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        if data.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "photo is empty".into()));
        }

        let photo = upload_profile_photo(state.storage.as_ref(), user_id, data, &content_type)
            .await
            .map_err(|e| {
                error!(error = %e, %user_id, "photo upload failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Photo upload failed".to_string())
            })?;
        info!(%user_id, key = %photo.key, "photo uploaded");
        return Ok((StatusCode::CREATED, Json(photo)));
    }

    Err((StatusCode::BAD_REQUEST, "photo is required".into()))
}
