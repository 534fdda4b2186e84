use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::model::{NewProvider, ProviderSetupToken};
use super::store::OnboardingStore;
use crate::error::OnboardingError;
use crate::providers::repo_types::Provider;

#[derive(Clone)]
pub struct PgOnboardingStore {
    db: PgPool,
}

impl PgOnboardingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OnboardingStore for PgOnboardingStore {
    async fn insert_setup_token(&self, token: &ProviderSetupToken) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO provider_setup_tokens (token, user_id, issued_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .execute(&self.db)
        .await
        .context("insert provider setup token")?;
        Ok(())
    }

    async fn replace_setup_token(&self, token: &ProviderSetupToken) -> Result<(), OnboardingError> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        // Row lock on the owner serializes concurrent re-issues.
        let is_provider: Option<bool> =
            sqlx::query_scalar("SELECT is_provider FROM users WHERE id = $1 FOR UPDATE")
                .bind(token.user_id)
                .fetch_optional(&mut *tx)
                .await
                .context("load token owner")?;
        if is_provider != Some(true) {
            return Err(OnboardingError::validation(
                "user did not register as a provider",
            ));
        }

        let has_profile: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM providers WHERE user_id = $1)")
                .bind(token.user_id)
                .fetch_one(&mut *tx)
                .await
                .context("check provider profile")?;
        if has_profile {
            return Err(OnboardingError::validation("provider setup already completed"));
        }

        sqlx::query("DELETE FROM provider_setup_tokens WHERE user_id = $1 AND consumed_at IS NULL")
            .bind(token.user_id)
            .execute(&mut *tx)
            .await
            .context("drop superseded setup token")?;

        // A consumed token left in place means a redemption committed meanwhile.
        sqlx::query(
            r#"
            INSERT INTO provider_setup_tokens (token, user_id, issued_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.issued_at)
        .bind(token.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                OnboardingError::validation("provider setup already completed")
            }
            _ => OnboardingError::Persistence(
                anyhow::Error::new(e).context("insert provider setup token"),
            ),
        })?;

        tx.commit().await.context("commit tx")?;
        debug!(user_id = %token.user_id, "setup token replaced");
        Ok(())
    }

    async fn find_active_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ProviderSetupToken>> {
        let row = sqlx::query_as::<_, ProviderSetupToken>(
            r#"
            SELECT token, user_id, issued_at, expires_at, consumed_at
              FROM provider_setup_tokens
             WHERE token = $1
               AND consumed_at IS NULL
               AND (expires_at IS NULL OR expires_at > $2)
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .context("find provider setup token")?;
        Ok(row)
    }

    async fn redeem_setup_token(
        &self,
        token: &str,
        provider: &NewProvider,
        now: OffsetDateTime,
    ) -> Result<Provider, OnboardingError> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        // A concurrent redeemer blocks on the row lock and then sees
        // consumed_at set, so it matches nothing.
        let owner: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE provider_setup_tokens
               SET consumed_at = $2
             WHERE token = $1
               AND consumed_at IS NULL
               AND (expires_at IS NULL OR expires_at > $2)
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .context("consume provider setup token")?;

        let Some(user_id) = owner else {
            return Err(OnboardingError::InvalidToken);
        };

        let created = sqlx::query_as::<_, Provider>(
            r#"
            INSERT INTO providers
                (id, user_id, category, title, description, experience, hourly_rate, profile_photo_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, category, title, description, experience, hourly_rate,
                      profile_photo_path, verification_status, created_at
            "#,
        )
        .bind(provider.id)
        .bind(user_id)
        .bind(&provider.category)
        .bind(&provider.title)
        .bind(&provider.description)
        .bind(&provider.experience)
        .bind(provider.hourly_rate)
        .bind(&provider.profile_photo_path)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| insert_error(e, &provider.category))?;

        if let Some(photo) = &provider.profile_photo_path {
            let res = sqlx::query("UPDATE users SET avatar = $2 WHERE id = $1")
                .bind(user_id)
                .bind(photo)
                .execute(&mut *tx)
                .await
                .context("update user avatar")?;
            if res.rows_affected() != 1 {
                return Err(anyhow::anyhow!("owner {user_id} of setup token not found").into());
            }
        }

        tx.commit().await.context("commit tx")?;
        debug!(%user_id, provider_id = %created.id, "setup token redeemed");
        Ok(created)
    }
}

const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

fn insert_error(e: sqlx::Error, category: &str) -> OnboardingError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return OnboardingError::validation(format!("unknown category '{category}'"));
        }
        if db_err.is_unique_violation() {
            return OnboardingError::validation("user already has a provider profile");
        }
        if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
            return OnboardingError::validation("hourly_rate out of range");
        }
    }
    OnboardingError::Persistence(anyhow::Error::new(e).context("insert provider"))
}
