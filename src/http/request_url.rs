//! Request URL module
//!
//! Rebuilds the absolute URL of a request from its `Host` header and raw
//! request target, and exposes the pathname and query parameters.

use std::collections::HashMap;

use url::Url;

/// Host used when the request carries no `Host` header
pub const DEFAULT_HOST: &str = "localhost";

/// Parsed request URL
#[derive(Debug, Clone)]
pub struct RequestUrl {
    url: Url,
    /// Decoded query parameters, last value wins on duplicate keys
    query: HashMap<String, String>,
    has_query: bool,
}

impl RequestUrl {
    /// Build `http://{host}{raw_target}` and parse it
    pub fn parse(host: Option<&str>, raw_target: &str) -> Result<Self, url::ParseError> {
        let full = format!("http://{}{raw_target}", host.unwrap_or(DEFAULT_HOST));
        let has_query = has_query_string(&full);
        let url = Url::parse(&full)?;
        let query = url.query_pairs().into_owned().collect();

        Ok(Self {
            url,
            query,
            has_query,
        })
    }

    /// Normalized path component (dot segments resolved)
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Decoded value of a query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Whether the request target carried a non-empty query string
    pub const fn has_query(&self) -> bool {
        self.has_query
    }
}

/// A query string is present when the text after the first `?` (up to the
/// next `?`) is non-empty
pub fn has_query_string(target: &str) -> bool {
    target.split('?').nth(1).is_some_and(|q| !q.is_empty())
}
