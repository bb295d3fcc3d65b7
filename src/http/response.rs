//! HTTP response building module
//!
//! `RouteResponse` is the plain value the router returns: status, headers
//! and body. The transport adapter turns it into a hyper response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, CONTENT_TYPE,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const CONTENT_TYPE_TEXT: &str = "text/plain";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// CORS headers set on every response
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        ACCESS_CONTROL_ALLOW_METHODS,
        "GET,POST,PUT,PATCH,DELETE,OPTIONS",
    ),
    (
        ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type, Authorization, X-Requested-With",
    ),
];

/// Response produced by the router
#[derive(Debug, Clone)]
pub struct RouteResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RouteResponse {
    /// Empty response carrying the CORS headers
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in CORS_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
        Self {
            status,
            headers,
            body: Bytes::new(),
        }
    }

    /// 204 No Content (preflight answer)
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT).with_header(CONTENT_LENGTH, "0")
    }

    /// Plain text response
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(CONTENT_TYPE, CONTENT_TYPE_TEXT)
            .with_body(body.into())
    }

    /// JSON response, serialized compactly
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(json) => Self::new(status)
                .with_header(CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(json),
            Err(e) => {
                crate::logger::log_error(&format!("Failed to serialize response: {e}"));
                Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_header(CONTENT_TYPE, CONTENT_TYPE_JSON)
                    .with_body(r#"{"error":"Internal server error"}"#)
            }
        }
    }

    /// 400 answered when the request URL cannot be parsed
    pub fn bad_request() -> Self {
        Self::text(StatusCode::BAD_REQUEST, "Bad Request")
    }

    fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and visible ASCII
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[cfg(test)]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Convert into a hyper response
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut builder = Response::builder().status(self.status);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(self.headers);
        }
        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            log_build_error(self.status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
