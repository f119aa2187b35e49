use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque token identifying one scan instance, as issued by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanIdentifier(String);

impl ScanIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ScanIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScanIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ScanIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of scan. Determines which backend endpoint is authoritative for stopping it.
///
/// Serializes to the backend's wire names (`VulnerabilityScan`, ...); the short
/// kebab-case forms are accepted when reading configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanType {
    #[serde(rename = "VulnerabilityScan", alias = "vulnerability")]
    Vulnerability,
    #[serde(rename = "SecretScan", alias = "secret")]
    Secret,
    #[serde(rename = "MalwareScan", alias = "malware")]
    Malware,
    #[serde(rename = "ComplianceScan", alias = "compliance")]
    Compliance,
    #[serde(rename = "CloudComplianceScan", alias = "cloud-compliance")]
    CloudCompliance,
}

impl ScanType {
    pub const ALL: [ScanType; 5] = [
        Self::Vulnerability,
        Self::Secret,
        Self::Malware,
        Self::Compliance,
        Self::CloudCompliance,
    ];

    /// Name used on the wire in `scan_type`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Vulnerability => "VulnerabilityScan",
            Self::Secret => "SecretScan",
            Self::Malware => "MalwareScan",
            Self::Compliance => "ComplianceScan",
            Self::CloudCompliance => "CloudComplianceScan",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vulnerability => "vulnerability",
            Self::Secret => "secret",
            Self::Malware => "malware",
            Self::Compliance => "compliance",
            Self::CloudCompliance => "cloud-compliance",
        }
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle) || t.wire_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!(
                "unknown scan type '{}' (expected one of: vulnerability, secret, malware, compliance, cloud-compliance)",
                s
            ))
    }
}

/// Body of one stop call. Built fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopScanRequest {
    pub scan_id: ScanIdentifier,
    pub scan_type: ScanType,
}

impl StopScanRequest {
    pub fn new(scan_id: ScanIdentifier, scan_type: ScanType) -> Self {
        Self { scan_id, scan_type }
    }
}
