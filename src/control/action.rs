use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{report_fatal, ScanCtlError};
use crate::models::{ActionResult, ScanIdentifier, ScanType, StopOutcome, StopScanRequest};
use super::coordinator::StopScanCoordinator;
use super::invalidation::ViewInvalidator;

/// Which of the selected scans a confirmed stop submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitPolicy {
    /// Only the first selected scan is stopped.
    #[default]
    FirstOnly,
    /// Every selected scan is stopped, one request at a time.
    All,
}

impl SubmitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstOnly => "first-only",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for SubmitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level stop action: submits, reconciles on success, and reports a record.
pub struct StopScanAction {
    coordinator: StopScanCoordinator,
    invalidator: Arc<ViewInvalidator>,
    policy: SubmitPolicy,
}

impl StopScanAction {
    pub fn new(
        coordinator: StopScanCoordinator,
        invalidator: Arc<ViewInvalidator>,
        policy: SubmitPolicy,
    ) -> Self {
        Self { coordinator, invalidator, policy }
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// Stops the selected scans according to the submit policy.
    ///
    /// Rejected and forbidden outcomes come back as `{success: false, message}`.
    /// Fatal outcomes come back as `Err`. Views are invalidated once, after the
    /// last request, if at least one scan was stopped.
    pub async fn run(
        &self,
        scan_ids: &[ScanIdentifier],
        scan_type: ScanType,
    ) -> Result<ActionResult, ScanCtlError> {
        let targets: Vec<ScanIdentifier> = match (self.policy, scan_ids) {
            (_, []) => vec![ScanIdentifier::default()],
            (SubmitPolicy::FirstOnly, [first, ..]) => vec![first.clone()],
            (SubmitPolicy::All, ids) => ids.to_vec(),
        };
        info!(
            scan_type = %scan_type,
            selected = scan_ids.len(),
            submitting = targets.len(),
            policy = %self.policy,
            "Submitting stop action"
        );

        let mut aggregate = StopOutcome::Success;
        let mut stopped = Vec::new();
        for scan_id in targets {
            let outcome = self
                .coordinator
                .stop_scan(StopScanRequest::new(scan_id.clone(), scan_type))
                .await;

            match outcome {
                StopOutcome::Success => stopped.push(scan_id),
                StopOutcome::Fatal(error) => {
                    self.reconcile(scan_type, stopped);
                    let error = ScanCtlError::from(error);
                    report_fatal("stop_scan", &error);
                    return Err(error);
                }
                other => aggregate = aggregate.worst(other),
            }
        }

        self.reconcile(scan_type, stopped);
        aggregate.into_action_result()
    }

    fn reconcile(&self, scan_type: ScanType, stopped: Vec<ScanIdentifier>) {
        if stopped.is_empty() {
            return;
        }
        self.invalidator.invalidate(scan_type, stopped);
    }
}
