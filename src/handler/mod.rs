//! Request handler module
//!
//! `spa` holds the resolution and cache-validation logic; `router` adapts it
//! to hyper's service interface.

pub mod path;
pub mod router;
pub mod spa;

// Re-export main entry points
pub use router::handle_request;
pub use spa::{Lookup, SpaHandler};
