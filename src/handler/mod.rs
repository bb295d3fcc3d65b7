//! Request handler module
//!
//! Route dispatch and the endpoint implementations behind it.

pub mod calculator;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
