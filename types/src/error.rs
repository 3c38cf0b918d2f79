use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaymarkError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
