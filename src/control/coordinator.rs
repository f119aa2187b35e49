use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{registry, PermissionMessageResolver, StopScanTransport};
use crate::errors::classify_stop_error;
use crate::models::{StopOutcome, StopScanRequest};

/// Sends stop requests to the endpoint of their scan type and classifies the result.
///
/// Holds no state between calls. Reporting the outcome is the caller's job.
pub struct StopScanCoordinator {
    transport: Arc<dyn StopScanTransport>,
    resolver: Arc<dyn PermissionMessageResolver>,
}

impl StopScanCoordinator {
    pub fn new(
        transport: Arc<dyn StopScanTransport>,
        resolver: Arc<dyn PermissionMessageResolver>,
    ) -> Self {
        Self { transport, resolver }
    }

    /// The scan id is forwarded as-is, even when empty; the backend decides validity.
    pub async fn stop_scan(&self, request: StopScanRequest) -> StopOutcome {
        let endpoint = registry::resolve(request.scan_type);
        info!(
            scan_id = %request.scan_id,
            scan_type = %request.scan_type,
            endpoint = endpoint.path,
            "Stopping scan"
        );

        let error = match self.transport.invoke(endpoint, &request).await {
            Ok(()) => {
                info!(scan_id = %request.scan_id, "Stop request accepted");
                return StopOutcome::Success;
            }
            Err(e) => e,
        };

        let outcome = classify_stop_error(error, self.resolver.as_ref()).await;
        match &outcome {
            StopOutcome::Rejected(message) => {
                warn!(scan_id = %request.scan_id, message = %message, "Stop request rejected")
            }
            StopOutcome::Forbidden(message) => {
                warn!(scan_id = %request.scan_id, message = %message, "Stop request forbidden")
            }
            StopOutcome::Fatal(error) => {
                debug!(scan_id = %request.scan_id, status = ?error.status(), error = %error, "Stop request failed")
            }
            StopOutcome::Success => {}
        }
        outcome
    }
}
