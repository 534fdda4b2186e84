use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::OnboardingError;

const MAX_TITLE_LEN: usize = 120;
const MAX_TEXT_LEN: usize = 5000;
const MAX_PHOTO_REF_LEN: usize = 2048;

/// Exclusive upper bound of `providers.hourly_rate` (`NUMERIC(10, 2)`).
pub(crate) fn hourly_rate_limit() -> Decimal {
    Decimal::new(100_000_000, 0)
}

/// One-time credential bound to a user registered with provider intent.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderSetupToken {
    pub token: String,
    pub user_id: Uuid,
    pub issued_at: OffsetDateTime,
    pub expires_at: Option<OffsetDateTime>,
    pub consumed_at: Option<OffsetDateTime>,
}

impl ProviderSetupToken {
    /// Issued, not consumed and not past its expiry at `now`.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.consumed_at.is_none() && self.expires_at.map_or(true, |exp| exp > now)
    }
}

/// Profile fields submitted together with a setup token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFields {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience: String,
    pub hourly_rate: Option<Decimal>,
}

/// Validated provider row, ready to be inserted for the token's owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvider {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: String,
    pub experience: String,
    pub hourly_rate: Option<Decimal>,
    pub profile_photo_path: Option<String>,
}

impl NewProvider {
    /// Trim and check every field. Nothing is persisted here, so a failure
    /// leaves the token untouched.
    pub fn validate(
        fields: ProviderFields,
        photo_reference: Option<String>,
    ) -> Result<Self, OnboardingError> {
        let category = required("category", &fields.category, 64)?.to_lowercase();
        let title = required("title", &fields.title, MAX_TITLE_LEN)?;
        let description = required("description", &fields.description, MAX_TEXT_LEN)?;
        let experience = required("experience", &fields.experience, MAX_TEXT_LEN)?;

        if let Some(rate) = fields.hourly_rate {
            if rate < Decimal::ZERO {
                return Err(OnboardingError::validation("hourly_rate must not be negative"));
            }
            if rate >= hourly_rate_limit() {
                return Err(OnboardingError::validation(format!(
                    "hourly_rate must be below {}",
                    hourly_rate_limit()
                )));
            }
            if rate.normalize().scale() > 2 {
                return Err(OnboardingError::validation(
                    "hourly_rate must have at most two decimal places",
                ));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            category,
            title,
            description,
            experience,
            hourly_rate: fields.hourly_rate,
            profile_photo_path: photo_path(photo_reference)?,
        })
    }
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String, OnboardingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OnboardingError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(OnboardingError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

// Blank counts as "no photo".
fn photo_path(reference: Option<String>) -> Result<Option<String>, OnboardingError> {
    let Some(reference) = reference else {
        return Ok(None);
    };
    let reference = reference.trim();
    if reference.is_empty() {
        return Ok(None);
    }
    if reference.len() > MAX_PHOTO_REF_LEN || reference.chars().any(char::is_whitespace) {
        return Err(OnboardingError::validation("photo_reference is malformed"));
    }
    Ok(Some(reference.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fields() -> ProviderFields {
        ProviderFields {
            category: " Cleaning ".into(),
            title: "House Cleaning".into(),
            description: "Weekly and one-off cleaning".into(),
            experience: "6 years".into(),
            hourly_rate: Some(Decimal::from_str("25.50").unwrap()),
        }
    }

    #[test]
    fn validate_trims_and_lowercases_category() {
        let p = NewProvider::validate(fields(), Some(" https://x/y.jpg ".into())).unwrap();
        assert_eq!(p.category, "cleaning");
        assert_eq!(p.title, "House Cleaning");
        assert_eq!(p.profile_photo_path.as_deref(), Some("https://x/y.jpg"));
    }

    #[test]
    fn hourly_rate_is_optional() {
        let mut f = fields();
        f.hourly_rate = None;
        assert!(NewProvider::validate(f, None).is_ok());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        for blank in ["category", "title", "description", "experience"] {
            let mut f = fields();
            match blank {
                "category" => f.category = "  ".into(),
                "title" => f.title = String::new(),
                "description" => f.description = "\n".into(),
                _ => f.experience = String::new(),
            }
            let err = NewProvider::validate(f, None).unwrap_err();
            assert!(
                matches!(err, OnboardingError::Validation(ref m) if m.contains(blank)),
                "{blank}: {err}"
            );
        }
    }

    #[test]
    fn bad_hourly_rates_are_rejected() {
        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("-1").unwrap());
        assert!(NewProvider::validate(f, None).is_err());

        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("10.125").unwrap());
        assert!(NewProvider::validate(f, None).is_err());

        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("10.500").unwrap());
        assert!(NewProvider::validate(f, None).is_ok());
    }

    #[test]
    fn negative_zero_rate_is_accepted() {
        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("-0.00").unwrap());
        assert!(NewProvider::validate(f, None).is_ok());
    }

    #[test]
    fn oversized_hourly_rate_is_rejected() {
        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("123456789012.00").unwrap());
        let err = NewProvider::validate(f, None).unwrap_err();
        assert!(matches!(err, OnboardingError::Validation(ref m) if m.contains("hourly_rate")));

        let mut f = fields();
        f.hourly_rate = Some(hourly_rate_limit());
        assert!(NewProvider::validate(f, None).is_err());

        let mut f = fields();
        f.hourly_rate = Some(Decimal::from_str("99999999.99").unwrap());
        assert!(NewProvider::validate(f, None).is_ok());
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut f = fields();
        f.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(NewProvider::validate(f, None).is_err());
    }

    #[test]
    fn blank_photo_reference_means_no_photo() {
        let p = NewProvider::validate(fields(), Some("   ".into())).unwrap();
        assert_eq!(p.profile_photo_path, None);
    }

    #[test]
    fn photo_reference_with_spaces_is_rejected() {
        let err = NewProvider::validate(fields(), Some("https://x/a b.jpg".into())).unwrap_err();
        assert!(matches!(err, OnboardingError::Validation(_)));
    }

    #[test]
    fn token_activity() {
        let now = OffsetDateTime::now_utc();
        let mut t = ProviderSetupToken {
            token: "t".into(),
            user_id: Uuid::new_v4(),
            issued_at: now,
            expires_at: None,
            consumed_at: None,
        };
        assert!(t.is_active(now));

        t.expires_at = Some(now - time::Duration::seconds(1));
        assert!(!t.is_active(now));

        t.expires_at = Some(now + time::Duration::hours(1));
        t.consumed_at = Some(now);
        assert!(!t.is_active(now));
    }
}
