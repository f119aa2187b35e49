use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::ScanCtlError;
use crate::models::{ActionResult, ScanIdentifier, ScanType};
use super::action::StopScanAction;

/// Lifecycle of one confirm-and-submit interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Confirming { scan_ids: Vec<ScanIdentifier> },
    Submitting,
    Succeeded,
    /// The stop was rejected or forbidden. The selection is kept so the user can retry.
    Failed { scan_ids: Vec<ScanIdentifier>, message: String },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Confirming { .. } => "confirming",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Drives a single stop-scan confirmation.
///
/// `Idle -> Confirming -> Submitting -> Succeeded | Failed`, with `Failed` able to
/// go back to `Submitting` on retry. The `Submitting` state refuses a second
/// confirmation, so at most one stop action is in flight per flow.
pub struct ConfirmationFlow {
    action: Arc<StopScanAction>,
    scan_type: ScanType,
    state: FlowState,
}

impl ConfirmationFlow {
    pub fn new(action: Arc<StopScanAction>, scan_type: ScanType) -> Self {
        Self {
            action,
            scan_type,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    /// Scans shown in the prompt, in selection order.
    pub fn selection(&self) -> &[ScanIdentifier] {
        match &self.state {
            FlowState::Confirming { scan_ids } | FlowState::Failed { scan_ids, .. } => scan_ids,
            _ => &[],
        }
    }

    /// Message of the last rejected/forbidden attempt.
    pub fn message(&self) -> Option<&str> {
        match &self.state {
            FlowState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// `Idle -> Confirming`. Duplicate ids are dropped, keeping first-seen order.
    pub fn request_cancel(&mut self, scan_ids: Vec<ScanIdentifier>) -> Result<(), ScanCtlError> {
        if self.state != FlowState::Idle {
            return Err(ScanCtlError::InvalidTransition(format!(
                "cannot request cancellation while {}",
                self.state.name()
            )));
        }

        let mut unique: Vec<ScanIdentifier> = Vec::with_capacity(scan_ids.len());
        for id in scan_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(ScanCtlError::InvalidRequest("no scans selected".into()));
        }

        debug!(count = unique.len(), scan_type = %self.scan_type, "Confirming scan cancellation");
        self.state = FlowState::Confirming { scan_ids: unique };
        Ok(())
    }

    /// Back to `Idle` without sending anything.
    ///
    /// Dismissing a flow whose `confirm` future was dropped mid-flight only
    /// detaches it; the stop request still runs to completion.
    pub fn dismiss(&mut self) -> Result<(), ScanCtlError> {
        match self.state {
            FlowState::Confirming { .. } | FlowState::Failed { .. } | FlowState::Submitting => {
                debug!(from = self.state.name(), "Dismissing stop confirmation");
                self.state = FlowState::Idle;
                Ok(())
            }
            _ => Err(ScanCtlError::InvalidTransition(format!(
                "cannot dismiss while {}",
                self.state.name()
            ))),
        }
    }

    /// Confirms (or retries) the stop.
    ///
    /// Success moves to `Succeeded`; rejection or denial moves to `Failed` and
    /// returns `{success: false, message}`. A fatal error resets the flow to `Idle`
    /// and is returned as `Err`.
    pub async fn confirm(&mut self) -> Result<ActionResult, ScanCtlError> {
        let scan_ids = match &self.state {
            FlowState::Confirming { scan_ids } | FlowState::Failed { scan_ids, .. } => scan_ids.clone(),
            FlowState::Submitting => return Err(ScanCtlError::FlowBusy),
            other => {
                return Err(ScanCtlError::InvalidTransition(format!(
                    "cannot confirm while {}",
                    other.name()
                )))
            }
        };
        self.state = FlowState::Submitting;

        // Runs detached so that dropping this future does not abort the request.
        let action = Arc::clone(&self.action);
        let scan_type = self.scan_type;
        let submitted = scan_ids.clone();
        let task = tokio::spawn(async move { action.run(&submitted, scan_type).await });

        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(ScanCtlError::Internal(format!("Stop task failed: {}", e))),
        };

        match result {
            Ok(record) if record.success => {
                info!(scan_type = %scan_type, "Scan cancellation started");
                self.state = FlowState::Succeeded;
                Ok(record)
            }
            Ok(record) => {
                self.state = FlowState::Failed {
                    scan_ids,
                    message: record.message.clone().unwrap_or_default(),
                };
                Ok(record)
            }
            Err(e) => {
                self.state = FlowState::Idle;
                Err(e)
            }
        }
    }
}
