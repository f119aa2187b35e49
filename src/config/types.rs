use serde::{Deserialize, Serialize};

use crate::control::SubmitPolicy;
use crate::models::ScanType;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanCtlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub stop: StopConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopConfig {
    #[serde(default)]
    pub policy: SubmitPolicy,
    #[serde(default = "default_scan_type")]
    pub default_scan_type: ScanType,
    /// Skip the interactive confirmation.
    #[serde(default)]
    pub assume_yes: bool,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            policy: SubmitPolicy::default(),
            default_scan_type: default_scan_type(),
            assume_yes: false,
        }
    }
}

fn default_scan_type() -> ScanType {
    ScanType::Vulnerability
}
