use async_trait::async_trait;
use thiserror::Error;

use crate::models::StopScanRequest;
use super::registry::StopEndpoint;

/// Failure of a stop call at the network boundary.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Raw response body, kept for the permission-message lookup.
        body: Option<String>,
    },

    #[error("request failed: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// Network seam for stop calls. `ApiClient` is the HTTP implementation.
#[async_trait]
pub trait StopScanTransport: Send + Sync {
    /// Sends one stop request to `endpoint`. Any 2xx response is success.
    async fn invoke(
        &self,
        endpoint: &StopEndpoint,
        request: &StopScanRequest,
    ) -> Result<(), TransportError>;
}
