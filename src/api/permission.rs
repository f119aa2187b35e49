use async_trait::async_trait;
use serde_json::Value;

use super::transport::TransportError;

pub const DEFAULT_FORBIDDEN_MESSAGE: &str =
    "You do not have enough permissions to perform this action.";

/// Turns a 403 error into a message fit for display. Must not fail.
#[async_trait]
pub trait PermissionMessageResolver: Send + Sync {
    async fn resolve(&self, error: &TransportError) -> String;
}

/// Reads `message` from the JSON error body, falling back to a fixed explanation.
#[derive(Debug, Clone)]
pub struct BodyMessageResolver {
    fallback: String,
}

impl BodyMessageResolver {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self { fallback: fallback.into() }
    }
}

impl Default for BodyMessageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FORBIDDEN_MESSAGE)
    }
}

#[async_trait]
impl PermissionMessageResolver for BodyMessageResolver {
    async fn resolve(&self, error: &TransportError) -> String {
        error
            .body()
            .and_then(|body| serde_json::from_str::<Value>(body).ok())
            .and_then(|data| data["message"].as_str().map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
