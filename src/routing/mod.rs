//! Routing module
//!
//! Declarative route tables and first-match lookup.

pub mod matcher;

pub use matcher::{match_route, Route, RouteAction};
