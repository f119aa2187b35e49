use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "api": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "base_url": { "type": "string" },
                    "api_token": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "accept_invalid_certs": { "type": "boolean" }
                }
            },
            "stop": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "policy": { "type": "string", "enum": ["first-only", "all"] },
                    "default_scan_type": {
                        "type": "string",
                        "enum": [
                            "vulnerability", "secret", "malware", "compliance", "cloud-compliance",
                            "VulnerabilityScan", "SecretScan", "MalwareScan", "ComplianceScan", "CloudComplianceScan"
                        ]
                    },
                    "assume_yes": { "type": "boolean" }
                }
            }
        }
    })
});
