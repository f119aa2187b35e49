use tracing::warn;

use crate::api::{PermissionMessageResolver, TransportError};
use crate::models::StopOutcome;
use super::types::ScanCtlError;

/// Maps a failed stop call to an outcome.
///
/// - 400 / 409: `Rejected` with the error's message
/// - 403: `Forbidden` with the message from `resolver`
/// - anything else, including transport failures: `Fatal`
///
/// No retries happen here.
pub async fn classify_stop_error(
    error: TransportError,
    resolver: &dyn PermissionMessageResolver,
) -> StopOutcome {
    match error.status() {
        Some(400) | Some(409) => StopOutcome::Rejected(error.message()),
        Some(403) => {
            let message = resolver.resolve(&error).await;
            StopOutcome::Forbidden(message)
        }
        _ => StopOutcome::Fatal(error),
    }
}

impl From<TransportError> for ScanCtlError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Status { status, message, .. } => ScanCtlError::Api { status, message },
            TransportError::Network(msg) => ScanCtlError::Network(msg),
            TransportError::Decode(msg) => ScanCtlError::Decode(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl ScanCtlError {
    /// Classify this error for logging. Nothing retries automatically; `retryable`
    /// only says whether re-submitting by hand could succeed.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            ScanCtlError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            ScanCtlError::Api { status, .. } if *status >= 500 => ErrorClassification {
                error_type: "ServerError",
                retryable: true,
            },
            ScanCtlError::Api { .. } => ErrorClassification {
                error_type: "ApiError",
                retryable: false,
            },
            ScanCtlError::FlowBusy => ErrorClassification {
                error_type: "FlowBusyError",
                retryable: true,
            },
            ScanCtlError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            ScanCtlError::InvalidRequest(_) => ErrorClassification {
                error_type: "InvalidRequestError",
                retryable: false,
            },
            ScanCtlError::InvalidTransition(_) => ErrorClassification {
                error_type: "InvalidTransitionError",
                retryable: false,
            },
            ScanCtlError::Decode(_) => ErrorClassification {
                error_type: "DecodeError",
                retryable: false,
            },
            ScanCtlError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
            ScanCtlError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            ScanCtlError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            ScanCtlError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }

    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanCtlError::Config(_) | ScanCtlError::Yaml(_) => 2,
            ScanCtlError::InvalidRequest(_) | ScanCtlError::InvalidTransition(_) => 4,
            _ => 1,
        }
    }
}

/// Logs a fatal stop failure at the boundary that receives it.
pub fn report_fatal(operation: &str, error: &ScanCtlError) {
    let class = error.classify();
    warn!(
        operation = operation,
        error_type = class.error_type,
        retryable = class.retryable,
        error = %error,
        "Stop request failed fatally"
    );
}
