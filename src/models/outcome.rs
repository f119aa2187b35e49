use serde::{Deserialize, Serialize};

use crate::api::TransportError;
use crate::errors::ScanCtlError;

/// Classified result of one stop call.
#[derive(Debug)]
pub enum StopOutcome {
    Success,
    /// Malformed request or conflict with the scan's current state (e.g. already stopped).
    Rejected(String),
    /// Caller lacks permission. The message comes from the permission lookup.
    Forbidden(String),
    /// Anything else. Not recoverable here and must reach the caller as an error.
    Fatal(TransportError),
}

impl StopOutcome {
    /// Ordering used by worst-of aggregation: Fatal > Forbidden > Rejected > Success.
    pub fn severity(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Rejected(_) => 1,
            Self::Forbidden(_) => 2,
            Self::Fatal(_) => 3,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected(_) => "rejected",
            Self::Forbidden(_) => "forbidden",
            Self::Fatal(_) => "fatal",
        }
    }

    /// Keeps the worse of the two outcomes; on a tie the existing one wins.
    pub fn worst(self, other: StopOutcome) -> StopOutcome {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    /// Converts into the record handed back to the caller of the stop action.
    /// `Fatal` is not representable as a record and comes back as an error.
    pub fn into_action_result(self) -> Result<ActionResult, ScanCtlError> {
        match self {
            Self::Success => Ok(ActionResult::succeeded()),
            Self::Rejected(message) | Self::Forbidden(message) => Ok(ActionResult::failed(message)),
            Self::Fatal(error) => Err(error.into()),
        }
    }
}

/// Aggregates outcomes worst-of. An empty input counts as success.
pub fn aggregate_outcomes<I>(outcomes: I) -> StopOutcome
where
    I: IntoIterator<Item = StopOutcome>,
{
    outcomes
        .into_iter()
        .fold(StopOutcome::Success, StopOutcome::worst)
}

/// Record returned by the top-level stop action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn succeeded() -> Self {
        Self { success: true, message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}
