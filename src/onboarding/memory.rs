use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{hourly_rate_limit, NewProvider, ProviderSetupToken};
use super::store::OnboardingStore;
use crate::error::OnboardingError;
use crate::providers::repo_types::{Provider, VerificationStatus};

/// In-memory store for tests. One mutex guards everything, so a redemption
/// is applied under a single critical section.
#[derive(Default)]
pub struct MemoryOnboardingStore {
    inner: Mutex<Inner>,
    fail_next_write: AtomicBool,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, MemUser>,
    tokens: HashMap<String, ProviderSetupToken>,
    providers: Vec<Provider>,
    categories: HashSet<String>,
}

struct MemUser {
    avatar: Option<String>,
    is_provider: bool,
}

impl MemoryOnboardingStore {
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for slug in ["cleaning", "plumbing", "tutoring"] {
                inner.categories.insert(slug.to_string());
            }
        }
        store
    }

    /// User registered with provider intent.
    pub fn add_user(&self, user_id: Uuid, avatar: Option<&str>) {
        self.inner.lock().unwrap().users.insert(
            user_id,
            MemUser {
                avatar: avatar.map(str::to_string),
                is_provider: true,
            },
        );
    }

    /// User registered without provider intent.
    pub fn add_customer(&self, user_id: Uuid) {
        self.inner.lock().unwrap().users.insert(
            user_id,
            MemUser {
                avatar: None,
                is_provider: false,
            },
        );
    }

    pub fn avatar(&self, user_id: Uuid) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .and_then(|u| u.avatar.clone())
    }

    pub fn token(&self, token: &str) -> Option<ProviderSetupToken> {
        self.inner.lock().unwrap().tokens.get(token).cloned()
    }

    pub fn providers_of(&self, user_id: Uuid) -> Vec<Provider> {
        self.inner
            .lock()
            .unwrap()
            .providers
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn provider_count(&self) -> usize {
        self.inner.lock().unwrap().providers.len()
    }

    /// Make the next write fail as if the backing store went away.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_next_write.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl OnboardingStore for MemoryOnboardingStore {
    async fn insert_setup_token(&self, token: &ProviderSetupToken) -> anyhow::Result<()> {
        if self.take_failure() {
            anyhow::bail!("injected write failure");
        }
        let mut inner = self.inner.lock().unwrap();
        anyhow::ensure!(
            !inner.tokens.values().any(|t| t.user_id == token.user_id),
            "user {} already has a setup token",
            token.user_id
        );
        inner.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn replace_setup_token(&self, token: &ProviderSetupToken) -> Result<(), OnboardingError> {
        if self.take_failure() {
            return Err(anyhow::anyhow!("injected write failure").into());
        }
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get(&token.user_id) {
            Some(u) if u.is_provider => {}
            _ => {
                return Err(OnboardingError::validation(
                    "user did not register as a provider",
                ))
            }
        }
        if inner.providers.iter().any(|p| p.user_id == token.user_id) {
            return Err(OnboardingError::validation("provider setup already completed"));
        }
        inner.tokens.retain(|_, t| t.user_id != token.user_id);
        inner.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_active_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ProviderSetupToken>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.tokens.get(token).filter(|t| t.is_active(now)).cloned())
    }

    async fn redeem_setup_token(
        &self,
        token: &str,
        provider: &NewProvider,
        now: OffsetDateTime,
    ) -> Result<Provider, OnboardingError> {
        let mut inner = self.inner.lock().unwrap();

        let user_id = match inner.tokens.get(token) {
            Some(t) if t.is_active(now) => t.user_id,
            _ => return Err(OnboardingError::InvalidToken),
        };
        // Constraints the providers table enforces.
        if provider.hourly_rate.is_some_and(|r| r >= hourly_rate_limit()) {
            return Err(OnboardingError::validation("hourly_rate out of range"));
        }
        if !inner.categories.contains(&provider.category) {
            return Err(OnboardingError::validation(format!(
                "unknown category '{}'",
                provider.category
            )));
        }
        if inner.providers.iter().any(|p| p.user_id == user_id) {
            return Err(OnboardingError::validation(
                "user already has a provider profile",
            ));
        }
        if !inner.users.contains_key(&user_id) {
            return Err(anyhow::anyhow!("owner {user_id} of setup token not found").into());
        }
        if self.take_failure() {
            return Err(anyhow::anyhow!("injected commit failure").into());
        }

        // Everything checked; apply all three effects.
        let created = Provider {
            id: provider.id,
            user_id,
            category: provider.category.clone(),
            title: provider.title.clone(),
            description: provider.description.clone(),
            experience: provider.experience.clone(),
            hourly_rate: provider.hourly_rate,
            profile_photo_path: provider.profile_photo_path.clone(),
            verification_status: VerificationStatus::Pending,
            created_at: now,
        };
        if let Some(t) = inner.tokens.get_mut(token) {
            t.consumed_at = Some(now);
        }
        if let (Some(photo), Some(owner)) =
            (&provider.profile_photo_path, inner.users.get_mut(&user_id))
        {
            owner.avatar = Some(photo.clone());
        }
        inner.providers.push(created.clone());
        Ok(created)
    }
}
