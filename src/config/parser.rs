use std::path::Path;

use reqwest::Url;
use tracing::{debug, warn};

use crate::errors::ScanCtlError;
use super::schema::CONFIG_SCHEMA;
use super::types::ScanCtlConfig;

pub const DEFAULT_CONFIG_PATH: &str = "./scanctl.yaml";
pub const ENV_BASE_URL: &str = "SCANCTL_BASE_URL";
pub const ENV_API_TOKEN: &str = "SCANCTL_API_TOKEN";

pub async fn parse_config(path: &Path) -> Result<ScanCtlConfig, ScanCtlError> {
    if !path.exists() {
        return Err(ScanCtlError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ScanCtlError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;
    // An empty file parses as null.
    let yaml = if yaml.is_null() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        yaml
    };

    validate_schema(&yaml)?;

    let config: ScanCtlConfig = serde_yaml::from_value(yaml)?;
    validate_config(&config)?;

    Ok(config)
}

/// Loads the explicit config file, or `./scanctl.yaml` when present, or defaults;
/// then applies environment overrides and validates the result.
pub async fn load_config(explicit: Option<&Path>) -> Result<ScanCtlConfig, ScanCtlError> {
    let mut config = match explicit {
        Some(path) => parse_config(path).await?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => parse_config(Path::new(DEFAULT_CONFIG_PATH)).await?,
        None => {
            debug!("No config file found, using defaults");
            ScanCtlConfig::default()
        }
    };

    apply_overrides(
        &mut config,
        std::env::var(ENV_BASE_URL).ok(),
        std::env::var(ENV_API_TOKEN).ok(),
    );
    validate_config(&config)?;

    Ok(config)
}

/// Replaces the base URL and API token when a non-empty override is given.
pub fn apply_overrides(config: &mut ScanCtlConfig, base_url: Option<String>, api_token: Option<String>) {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url;
    }
    if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
        config.api.api_token = Some(token);
    }
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ScanCtlError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| ScanCtlError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| ScanCtlError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ScanCtlError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: typed parsing below is what rejects bad values.
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Semantic checks serde cannot express.
pub fn validate_config(config: &ScanCtlConfig) -> Result<(), ScanCtlError> {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(ScanCtlError::Config("api.base_url must not be empty".into()));
    }

    let parsed = Url::parse(base_url)
        .map_err(|e| ScanCtlError::Config(format!("api.base_url '{}' is not a valid URL: {}", base_url, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ScanCtlError::Config(format!(
            "api.base_url must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ScanCtlError::Config("api.timeout_secs must be at least 1".into()));
    }

    if config.api.api_token.as_ref().map_or(true, |t| t.is_empty()) {
        debug!("No API token configured, requests will be unauthenticated");
    }
    if config.api.accept_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }

    Ok(())
}
