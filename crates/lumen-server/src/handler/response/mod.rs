//! Response types for HTTP handlers.

mod analysis;
mod errors;
mod monitors;

pub use analysis::*;
pub use errors::*;
pub use monitors::*;
