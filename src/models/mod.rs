pub mod scan;
pub mod outcome;

pub use scan::*;
pub use outcome::*;
