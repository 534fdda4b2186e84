use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures of the provider onboarding flow.
///
/// None of these leave partial state behind: on every variant the setup
/// token is still in whatever state it was before the call.
#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Invalid or expired setup token")]
    InvalidToken,

    #[error("{0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl OnboardingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        let status = match self {
            OnboardingError::InvalidToken => StatusCode::UNAUTHORIZED,
            OnboardingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OnboardingError::Persistence(ref e) => {
                error!(error = %e, "onboarding persistence failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            OnboardingError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            OnboardingError::validation("title is required")
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            OnboardingError::Persistence(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_token_message() {
        assert_eq!(
            OnboardingError::InvalidToken.to_string(),
            "Invalid or expired setup token"
        );
    }
}
