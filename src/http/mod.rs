//! HTTP protocol layer module
//!
//! Request URL parsing and the response value produced by the router,
//! decoupled from the hyper transport that carries them.

pub mod request_url;
pub mod response;

// Re-export commonly used types
pub use request_url::RequestUrl;
pub use response::RouteResponse;
