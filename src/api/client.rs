use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::ScanCtlError;
use crate::models::StopScanRequest;
use super::registry::StopEndpoint;
use super::transport::{StopScanTransport, TransportError};

/// HTTP client for the scan-control API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ScanCtlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(user_agent())
            .build()
            .map_err(|e| ScanCtlError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StopScanTransport for ApiClient {
    async fn invoke(
        &self,
        endpoint: &StopEndpoint,
        request: &StopScanRequest,
    ) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, endpoint.path);
        debug!(operation = endpoint.operation, url = %url, scan_id = %request.scan_id, "Sending stop request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Network(format!("{} timed out: {}", endpoint.operation, e))
            } else {
                TransportError::Network(format!("{} failed: {}", endpoint.operation, e))
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        // An unreadable body still yields a Status error; the message falls back to the reason.
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            }
        };
        debug!(status = status.as_u16(), body_len = body.len(), "Stop request returned an error status");

        Err(TransportError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
            body: if body.is_empty() { None } else { Some(body) },
        })
    }
}

/// `scanctl/<version> (<git hash>)`, so backend access logs show which build sent a stop.
pub fn user_agent() -> String {
    format!(
        "scanctl/{} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("SCANCTL_GIT_HASH").unwrap_or("dev")
    )
}

/// Picks the user-facing message out of an error response.
///
/// Order: the JSON `message` field, then `error_fields` rendered as
/// `field: message` pairs, then a plain-text or JSON-string body, then the
/// status reason.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(data) => {
            if let Some(message) = data["message"].as_str().filter(|m| !m.trim().is_empty()) {
                return message.to_string();
            }
            if let Some(fields) = data["error_fields"].as_object().filter(|f| !f.is_empty()) {
                let mut pairs: Vec<String> = fields
                    .iter()
                    .map(|(field, msg)| match msg.as_str() {
                        Some(text) => format!("{}: {}", field, text),
                        None => format!("{}: {}", field, msg),
                    })
                    .collect();
                pairs.sort();
                return pairs.join("; ");
            }
            if let Some(text) = data.as_str().map(str::trim).filter(|t| !t.is_empty()) {
                return text.to_string();
            }
        }
        Err(_) => {
            let text = body.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
