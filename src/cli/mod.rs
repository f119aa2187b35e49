pub mod commands;
pub mod stop;

pub use commands::{Cli, Commands};
