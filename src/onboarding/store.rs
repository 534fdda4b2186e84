use async_trait::async_trait;
use time::OffsetDateTime;

use super::model::{NewProvider, ProviderSetupToken};
use crate::error::OnboardingError;
use crate::providers::repo_types::Provider;

/// Persistence seam of the onboarding flow.
#[async_trait]
pub trait OnboardingStore: Send + Sync {
    /// Persist a freshly issued token.
    async fn insert_setup_token(&self, token: &ProviderSetupToken) -> anyhow::Result<()>;

    /// Issue a new token for a provider-intent user whose setup is not done
    /// yet, superseding any unconsumed token they hold. `Validation` when the
    /// user did not register as a provider or already has a profile.
    async fn replace_setup_token(&self, token: &ProviderSetupToken) -> Result<(), OnboardingError>;

    /// Return the token if it exists and is still active at `now`.
    async fn find_active_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ProviderSetupToken>>;

    /// Single unit of work: consume the token with a compare-and-set on its
    /// active state, insert the provider for the token's owner and copy the
    /// photo into the owner's avatar. Either all three become visible or none.
    ///
    /// Returns `InvalidToken` when the compare-and-set matches nothing.
    async fn redeem_setup_token(
        &self,
        token: &str,
        provider: &NewProvider,
        now: OffsetDateTime,
    ) -> Result<Provider, OnboardingError>;
}
