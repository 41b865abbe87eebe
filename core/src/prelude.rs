use crate::api::{DetectResponse, DisasterRecord};
use async_trait::async_trait;

/// Failure to obtain a usable response from the backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("network error: {0}")]
    Request(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Error reported by the backend inside an otherwise readable response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LogicalError(pub String);

pub type TransportResult<T> = Result<T, TransportError>;

/// The two backend operations the dashboard consumes.
#[async_trait]
pub trait DisasterApi: Send + Sync {
    /// `GET /api/disasters`
    async fn list_disasters(&self) -> TransportResult<Vec<DisasterRecord>>;

    /// `POST /detect`
    async fn classify(&self, image_url: &str) -> TransportResult<DetectResponse>;
}
