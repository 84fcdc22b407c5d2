use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy. Every variant maps to exactly one HTTP status
/// and a JSON body of the shape `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed caller input, a bad wallet address or a missing tweet URL.
    #[error("{0}")]
    InvalidInput(String),

    /// Mainnet balance below the configured anti-sybil threshold.
    #[error("{0}")]
    InsufficientBalance(String),

    /// Social proof lookup failed upstream, fate of the tweet unknown.
    #[error("{0}")]
    Verification(String),

    /// Tweet exists but does not carry the required marker phrase.
    #[error("{0}")]
    ContentRequirement(String),

    /// Tweet id already consumed by an earlier claim.
    #[error("{0}")]
    DuplicateProof(String),

    /// Per-wallet cooldown window still open.
    #[error("{0}")]
    Cooldown(String),

    /// Per-wallet daily claim count exhausted.
    #[error("{0}")]
    DailyLimit(String),

    /// Faucet-wide daily budget exhausted.
    #[error("{0}")]
    BudgetExhausted(String),

    /// On-chain transfer failed or never confirmed.
    #[error("{0}")]
    Distribution(String),

    /// Unique-index collision while recording a claim that already paid out.
    #[error("{0}")]
    Conflict(String),

    /// Invalid or placeholder runtime configuration.
    #[error("{0}")]
    Configuration(String),

    /// A dependency (RPC node, social API) answered with garbage or not at all.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),

    #[error(transparent)]
    AxumJsonRejection(#[from] JsonRejection),

    #[error(transparent)]
    MongoError(#[from] mongodb::error::Error),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),

    #[error("{0}")]
    InternalServerErrorWithContext(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InsufficientBalance(_)
            | AppError::ContentRequirement(_)
            | AppError::DuplicateProof(_)
            | AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::AxumJsonRejection(_) => StatusCode::BAD_REQUEST,
            AppError::Cooldown(_) | AppError::DailyLimit(_) | AppError::BudgetExhausted(_) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Verification(_)
            | AppError::Distribution(_)
            | AppError::Conflict(_)
            | AppError::Configuration(_)
            | AppError::Upstream(_)
            | AppError::MongoError(_)
            | AppError::AnyhowError(_)
            | AppError::InternalServerErrorWithContext(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body. Driver and catch-all errors are
    /// replaced with a generic line so no internal detail reaches the caller.
    fn client_message(&self) -> String {
        match self {
            AppError::MongoError(_) => "Database error occurred".to_string(),
            AppError::AnyhowError(_) | AppError::InternalServerErrorWithContext(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("🔴 request failed with {}: {}", status, self);
        }
        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_mistakes_map_to_400() {
        let errors = [
            AppError::InvalidInput("Invalid wallet address".to_string()),
            AppError::InsufficientBalance("too poor".to_string()),
            AppError::ContentRequirement("no marker".to_string()),
            AppError::DuplicateProof("already used".to_string()),
            AppError::BadRequest("bad".to_string()),
        ];
        for e in errors {
            assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn rate_limits_map_to_429() {
        let errors = [
            AppError::Cooldown("wait".to_string()),
            AppError::DailyLimit("limit".to_string()),
            AppError::BudgetExhausted("dry".to_string()),
        ];
        for e in errors {
            assert_eq!(e.status_code(), StatusCode::TOO_MANY_REQUESTS);
        }
    }

    #[test]
    fn faucet_side_failures_map_to_500() {
        let errors = [
            AppError::Verification("upstream".to_string()),
            AppError::Distribution("tx failed".to_string()),
            AppError::Conflict("duplicate after send".to_string()),
            AppError::Configuration("placeholder key".to_string()),
            AppError::Upstream("rpc down".to_string()),
        ];
        for e in errors {
            assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn anyhow_errors_do_not_leak_detail() {
        let e = AppError::from(anyhow::anyhow!("secret connection string"));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.client_message(), "Internal server error");
    }

    #[test]
    fn context_errors_do_not_leak_detail() {
        let e = AppError::InternalServerErrorWithContext(
            "stored claim 42 has unparseable amount".to_string(),
        );
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.client_message(), "Internal server error");
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let e = AppError::Cooldown("Please wait 3 minute(s) before claiming again".to_string());
        assert_eq!(
            e.client_message(),
            "Please wait 3 minute(s) before claiming again"
        );
    }
}
