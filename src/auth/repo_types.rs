use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub email: String,                // user email, lower-cased
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub name: Option<String>,
    pub is_provider: bool,            // registered with provider intent
    pub avatar: Option<String>,       // photo reference
    pub disclaimer_accepted: bool,
    pub created_at: OffsetDateTime,   // creation timestamp
}

/// Fields for inserting a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: Option<&'a str>,
    pub is_provider: bool,
    pub disclaimer_accepted: bool,
}
