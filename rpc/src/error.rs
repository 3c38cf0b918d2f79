//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use waymark_verification::VerificationError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("contributor not found: {0}")]
    ContributorNotFound(String),

    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("conflicting concurrent updates: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ContributorNotFound(_) | Self::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VerificationError> for RpcError {
    fn from(e: VerificationError) -> Self {
        match e {
            VerificationError::ContributorNotFound(id) => RpcError::ContributorNotFound(id),
            VerificationError::SubmissionNotFound(id) => RpcError::SubmissionNotFound(id),
            VerificationError::InvalidChoice(raw) => {
                RpcError::InvalidRequest(format!("invalid vote choice: {raw}"))
            }
            VerificationError::Conflict(retries) => {
                RpcError::Conflict(format!("gave up after {retries} retries"))
            }
            VerificationError::Store(e) => RpcError::Store(e.to_string()),
        }
    }
}

impl From<waymark_store::StoreError> for RpcError {
    fn from(e: waymark_store::StoreError) -> Self {
        match e {
            waymark_store::StoreError::NotFound(key) => {
                RpcError::Store(format!("not found: {key}"))
            }
            waymark_store::StoreError::Duplicate(key) => {
                RpcError::InvalidRequest(format!("already exists: {key}"))
            }
            other => RpcError::Store(other.to_string()),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_store::StoreError;

    #[test]
    fn verification_errors_map_to_expected_statuses() {
        let cases = [
            (
                RpcError::from(VerificationError::ContributorNotFound("ctr_x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                RpcError::from(VerificationError::SubmissionNotFound("sub_x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                RpcError::from(VerificationError::InvalidChoice("maybe".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                RpcError::from(VerificationError::Conflict(5)),
                StatusCode::CONFLICT,
            ),
            (
                RpcError::from(VerificationError::Store(StoreError::Backend("down".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn duplicate_insert_is_a_client_error() {
        let err = RpcError::from(StoreError::Duplicate("ctr_x".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
