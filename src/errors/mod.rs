pub mod types;
pub mod classification;

pub use types::ScanCtlError;
pub use classification::{classify_stop_error, report_fatal, ErrorClassification};
