use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Category, Provider};

const PROVIDER_COLUMNS: &str = "id, user_id, category, title, description, experience, hourly_rate, \
     profile_photo_path, verification_status, created_at";

/// Find a provider by id.
pub async fn get_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Provider>> {
    let row = sqlx::query_as::<_, Provider>(&format!(
        "SELECT {PROVIDER_COLUMNS} FROM providers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get provider by id")?;
    Ok(row)
}

/// Provider profile owned by a user, if any.
pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Provider>> {
    let row = sqlx::query_as::<_, Provider>(&format!(
        "SELECT {PROVIDER_COLUMNS} FROM providers WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get provider by user")?;
    Ok(row)
}

/// Newest first, optionally narrowed to one category.
pub async fn list(
    db: &PgPool,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Provider>> {
    let rows = sqlx::query_as::<_, Provider>(&format!(
        r#"
        SELECT {PROVIDER_COLUMNS}
          FROM providers
         WHERE ($1::text IS NULL OR category = $1)
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3
        "#
    ))
    .bind(category)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list providers")?;
    Ok(rows)
}

pub async fn list_categories(db: &PgPool) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>("SELECT slug, name FROM categories ORDER BY name ASC")
        .fetch_all(db)
        .await
        .context("list categories")?;
    Ok(rows)
}
