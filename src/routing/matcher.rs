//! Route matching module
//!
//! A route table is an ordered slice of `(method, path) -> action` entries.

use hyper::Method;

/// What to do when a route matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// JSON addition of two query operands
    Sum,
    /// Plain text echo of `nombre`, `apellido` and `cedula`
    Consulta,
    /// Fixed plain text body
    Text(&'static str),
}

/// Route table entry
#[derive(Debug)]
pub struct Route {
    /// Required method, `None` matches any method
    pub method: Option<Method>,
    /// Exact path
    pub path: &'static str,
    pub action: RouteAction,
}

impl Route {
    pub const fn new(method: Option<Method>, path: &'static str, action: RouteAction) -> Self {
        Self {
            method,
            path,
            action,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.path == path && self.method.as_ref().map_or(true, |m| m == method)
    }
}

/// Find the first route matching method and path exactly
pub fn match_route<'a>(method: &Method, path: &str, routes: &'a [Route]) -> Option<&'a Route> {
    routes.iter().find(|route| route.matches(method, path))
}
