use crate::auth::repo_types::{NewUser, User};
use sqlx::PgPool;
use uuid::Uuid;

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, is_provider, avatar, disclaimer_accepted, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, is_provider, avatar, disclaimer_accepted, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, is_provider, disclaimer_accepted)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, is_provider, avatar, disclaimer_accepted, created_at
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.name)
        .bind(new.is_provider)
        .bind(new.disclaimer_accepted)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Profile edits. `None` leaves a column as is; an empty avatar clears it.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        avatar: Option<&str>,
        disclaimer_accepted: Option<bool>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET avatar = CASE WHEN $2::text IS NULL THEN avatar ELSE NULLIF($2, '') END,
                   disclaimer_accepted = COALESCE($3, disclaimer_accepted)
             WHERE id = $1
            RETURNING id, email, password_hash, name, is_provider, avatar, disclaimer_accepted, created_at
            "#,
        )
        .bind(id)
        .bind(avatar)
        .bind(disclaimer_accepted)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }
}
