use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::ProviderQuery;
use super::repo;
use super::repo_types::{Category, Provider};
use crate::{auth::jwt::AuthUser, state::AppState};

pub fn provider_routes() -> Router<AppState> {
    Router::new()
        .route("/providers", get(list_providers))
        .route("/providers/:id", get(get_provider))
        .route("/me/provider", get(get_my_provider))
        .route("/categories", get(list_categories))
}

#[instrument(skip(state))]
pub async fn list_providers(
    State(state): State<AppState>,
    Query(q): Query<ProviderQuery>,
) -> Result<Json<Vec<Provider>>, (StatusCode, String)> {
    let (category, limit, offset) = q.normalized();
    let rows = repo::list(&state.db, category.as_deref(), limit, offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Provider>, (StatusCode, String)> {
    match repo::get_by_id(&state.db, id).await.map_err(internal)? {
        Some(p) => Ok(Json(p)),
        None => Err((StatusCode::NOT_FOUND, "Provider not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn get_my_provider(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Provider>, (StatusCode, String)> {
    match repo::get_by_user(&state.db, user_id).await.map_err(internal)? {
        Some(p) => Ok(Json(p)),
        None => Err((StatusCode::NOT_FOUND, "Provider profile not set up".into())),
    }
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let rows = repo::list_categories(&state.db).await.map_err(internal)?;
    Ok(Json(rows))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "provider query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}
