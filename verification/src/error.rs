use thiserror::Error;
use waymark_store::StoreError;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("contributor not found: {0}")]
    ContributorNotFound(String),

    #[error("invalid vote choice: {0:?} (expected \"yes\" or \"no\")")]
    InvalidChoice(String),

    #[error("vote lost {0} optimistic-concurrency races, giving up")]
    Conflict(u32),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
