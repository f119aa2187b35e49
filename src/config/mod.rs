pub mod parser;
pub mod schema;
pub mod types;

pub use types::*;
pub use parser::{apply_overrides, load_config, parse_config, validate_config};
