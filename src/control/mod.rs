pub mod coordinator;
pub mod invalidation;
pub mod action;
pub mod flow;

pub use coordinator::StopScanCoordinator;
pub use invalidation::{InvalidationEvent, ViewInvalidator};
pub use action::{StopScanAction, SubmitPolicy};
pub use flow::{ConfirmationFlow, FlowState};
