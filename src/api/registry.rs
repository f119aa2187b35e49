use crate::models::ScanType;

/// Backend operation that stops scans of one type.
#[derive(Debug, PartialEq, Eq)]
pub struct StopEndpoint {
    pub scan_type: ScanType,
    /// Operation name, used in logs.
    pub operation: &'static str,
    pub path: &'static str,
}

static VULNERABILITY: StopEndpoint = StopEndpoint {
    scan_type: ScanType::Vulnerability,
    operation: "stopVulnerabilityScan",
    path: "/deepfence/scan/vulnerability/stop",
};

static SECRET: StopEndpoint = StopEndpoint {
    scan_type: ScanType::Secret,
    operation: "stopSecretScan",
    path: "/deepfence/scan/secret/stop",
};

static MALWARE: StopEndpoint = StopEndpoint {
    scan_type: ScanType::Malware,
    operation: "stopMalwareScan",
    path: "/deepfence/scan/malware/stop",
};

static COMPLIANCE: StopEndpoint = StopEndpoint {
    scan_type: ScanType::Compliance,
    operation: "stopComplianceScan",
    path: "/deepfence/scan/compliance/stop",
};

static CLOUD_COMPLIANCE: StopEndpoint = StopEndpoint {
    scan_type: ScanType::CloudCompliance,
    operation: "stopCloudComplianceScan",
    path: "/deepfence/scan/cloud-compliance/stop",
};

/// Resolves the stop endpoint for a scan type. Keep this match exhaustive:
/// a new `ScanType` must not build until it has an endpoint here.
pub fn resolve(scan_type: ScanType) -> &'static StopEndpoint {
    match scan_type {
        ScanType::Vulnerability => &VULNERABILITY,
        ScanType::Secret => &SECRET,
        ScanType::Malware => &MALWARE,
        ScanType::Compliance => &COMPLIANCE,
        ScanType::CloudCompliance => &CLOUD_COMPLIANCE,
    }
}
