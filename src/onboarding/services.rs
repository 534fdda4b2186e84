use std::sync::Arc;

use axum::extract::FromRef;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{NewProvider, ProviderFields, ProviderSetupToken};
use super::store::OnboardingStore;
use super::token;
use crate::error::OnboardingError;
use crate::providers::repo_types::Provider;
use crate::state::AppState;

/// Issues provider setup tokens and redeems them into provider profiles.
#[derive(Clone)]
pub struct ProviderOnboarding {
    store: Arc<dyn OnboardingStore>,
    token_ttl: Option<Duration>,
}

impl FromRef<AppState> for ProviderOnboarding {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.onboarding.clone(),
            state.config.onboarding.token_ttl_hours.map(Duration::hours),
        )
    }
}

impl ProviderOnboarding {
    pub fn new(store: Arc<dyn OnboardingStore>, token_ttl: Option<Duration>) -> Self {
        Self { store, token_ttl }
    }

    /// Returns a token only when `intends_to_be_provider` is set and the token
    /// was persisted.
    pub async fn issue_setup_token(
        &self,
        user_id: Uuid,
        intends_to_be_provider: bool,
    ) -> Result<Option<String>, OnboardingError> {
        if !intends_to_be_provider {
            return Ok(None);
        }

        let issued_at = OffsetDateTime::now_utc();
        let record = ProviderSetupToken {
            token: token::generate(),
            user_id,
            issued_at,
            expires_at: self.token_ttl.map(|ttl| issued_at + ttl),
            consumed_at: None,
        };
        self.store.insert_setup_token(&record).await?;

        info!(%user_id, expires_at = ?record.expires_at, "provider setup token issued");
        Ok(Some(record.token))
    }

    /// Fresh token for a provider-intent user who has not completed setup,
    /// e.g. after the registration-time issue failed or the token expired.
    /// Any unconsumed token the user still holds stops working.
    pub async fn reissue_setup_token(
        &self,
        user_id: Uuid,
    ) -> Result<ProviderSetupToken, OnboardingError> {
        let issued_at = OffsetDateTime::now_utc();
        let record = ProviderSetupToken {
            token: token::generate(),
            user_id,
            issued_at,
            expires_at: self.token_ttl.map(|ttl| issued_at + ttl),
            consumed_at: None,
        };
        self.store.replace_setup_token(&record).await?;

        info!(%user_id, expires_at = ?record.expires_at, "provider setup token reissued");
        Ok(record)
    }

    /// Token check, then field validation, then the atomic unit of work.
    pub async fn complete_provider_setup(
        &self,
        setup_token: &str,
        fields: ProviderFields,
        photo_reference: Option<String>,
    ) -> Result<Provider, OnboardingError> {
        let setup_token = setup_token.trim();
        if !token::is_well_formed(setup_token) {
            warn!("malformed provider setup token");
            return Err(OnboardingError::InvalidToken);
        }

        let Some(active) = self
            .store
            .find_active_token(setup_token, OffsetDateTime::now_utc())
            .await?
        else {
            warn!("unknown, consumed or expired provider setup token");
            return Err(OnboardingError::InvalidToken);
        };

        let provider = NewProvider::validate(fields, photo_reference).map_err(|e| {
            warn!(user_id = %active.user_id, error = %e, "provider fields rejected");
            e
        })?;

        // Expiry is checked again against the commit-time clock.
        let created = self
            .store
            .redeem_setup_token(setup_token, &provider, OffsetDateTime::now_utc())
            .await?;

        info!(
            user_id = %created.user_id,
            provider_id = %created.id,
            with_photo = created.profile_photo_path.is_some(),
            "provider setup completed"
        );
        Ok(created)
    }
}
