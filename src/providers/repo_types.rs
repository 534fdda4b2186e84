use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Moderation state of a provider profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "verification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

/// Provider profile record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Provider {
    pub id: Uuid,
    pub user_id: Uuid,                      // owning user, 1:1
    pub category: String,                   // categories.slug
    pub title: String,
    pub description: String,
    pub experience: String,
    pub hourly_rate: Option<Decimal>,
    pub profile_photo_path: Option<String>, // same value as users.avatar at creation
    pub verification_status: VerificationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Service category, e.g. `cleaning`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub slug: String,
    pub name: String,
}
