pub mod registry;
pub mod transport;
pub mod client;
pub mod permission;

pub use registry::{resolve, StopEndpoint};
pub use transport::{StopScanTransport, TransportError};
pub use client::ApiClient;
pub use permission::{BodyMessageResolver, PermissionMessageResolver, DEFAULT_FORBIDDEN_MESSAGE};
