//! Request handling errors

use thiserror::Error;

/// Query parameter validation failure, answered with a 400 JSON body
///
/// The `Display` text is the exact `error` message sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Parameter absent or empty
    #[error("Falta el parámetro '{0}'.")]
    Missing(&'static str),

    /// Parameter present but not a finite number
    #[error("'{0}' debe ser un número válido.")]
    InvalidNumber(&'static str),
}

/// Failure that prevents the router from producing any response
#[derive(Debug, Error)]
pub enum RouterError {
    /// `Host` header and request target do not form a valid URL
    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
