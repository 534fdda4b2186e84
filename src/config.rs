use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// S3-compatible object storage used for uploaded profile photos.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base of the durable URLs handed back to clients, without trailing slash.
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// Lifetime of a provider setup token. `None` means tokens never expire.
    pub token_ttl_hours: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub onboarding: OnboardingConfig,
}

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "marketplace".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "marketplace-users".into()),
            ttl_minutes: parse_env("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: parse_env("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };

        let endpoint = std::env::var("S3_ENDPOINT")?;
        let bucket = std::env::var("S3_BUCKET")?;
        let public_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let storage = StorageConfig {
            access_key: std::env::var("S3_ACCESS_KEY")?,
            secret_key: std::env::var("S3_SECRET_KEY")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_url: public_url.trim_end_matches('/').to_string(),
            endpoint,
            bucket,
        };

        let onboarding = OnboardingConfig {
            token_ttl_hours: token_ttl_from(parse_env("PROVIDER_TOKEN_TTL_HOURS")),
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            onboarding,
        })
    }
}

fn parse_env(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse::<i64>().ok())
}

// Zero or negative disables expiry.
fn token_ttl_from(raw: Option<i64>) -> Option<i64> {
    match raw.unwrap_or(DEFAULT_TOKEN_TTL_HOURS) {
        h if h <= 0 => None,
        h => Some(h),
    }
}
