//! Request routing dispatch module
//!
//! `route` turns a request description into a `RouteResponse` without
//! touching the transport; `handle_request` adapts it to hyper.

use crate::config::AppState;
use crate::error::RouterError;
use crate::handler::calculator;
use crate::http::{RequestUrl, RouteResponse};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{match_route, Route, RouteAction};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HOST, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Uri, Version};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Path every request with a query string is dispatched as
const CONSULTA_PATH: &str = "/consulta";

/// Rendered for `/consulta` parameters missing from a query string
const MISSING_PLACEHOLDER: &str = "null";

const USAGE_HELP: &str = "Endpoint incorrecto para consulta por Query Params. \n \
Intente nuevamente con http://127.0.0.1:3000/consulta?nombre=elfar&apellido=morantes&cedula=808080\n \
Tambien puede intentar http://127.0.0.1:3000/suma?dato1=5&dato2=6 \n\
O algunos endpoint mas sencillos como /hola /didier o /borrar \n";

/// Matched against the parsed pathname
static API_ROUTES: &[Route] = &[Route::new(Some(Method::GET), "/suma", RouteAction::Sum)];

/// Matched against the raw target, or `/consulta` when a query string is present
static TEXT_ROUTES: &[Route] = &[
    Route::new(None, "/", RouteAction::Text("Hola Mundoooooooo")),
    Route::new(
        None,
        "/hola",
        RouteAction::Text("Este es un saludo diferente a hola mundo"),
    ),
    Route::new(None, "/didier", RouteAction::Text("Bienvenido didier")),
    Route::new(None, CONSULTA_PATH, RouteAction::Consulta),
    Route::new(
        None,
        "/consulta/sql/id/",
        RouteAction::Text("Vamos a la base de datos SQL usando el enpoint /consulta/sql/id/ ..."),
    ),
    Route::new(
        None,
        "/consulta/sql/nombre/",
        RouteAction::Text("Vamos a la base de datos"),
    ),
    Route::new(
        None,
        "/consulta/nosql",
        RouteAction::Text("Vamos a la base de datos"),
    ),
    Route::new(
        None,
        "/borrar",
        RouteAction::Text("Eliminamos de la base de datos"),
    ),
];

/// Transport-independent view of an incoming request
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub method: Method,
    /// Request target as received (path plus optional query)
    pub target: String,
    /// `Host` header, if present
    pub host: Option<String>,
}

impl RouteRequest {
    pub fn new(method: Method, target: impl Into<String>, host: Option<&str>) -> Self {
        Self {
            method,
            target: target.into(),
            host: host.map(ToString::to_string),
        }
    }

    pub fn from_hyper<B>(req: &Request<B>) -> Self {
        let host = req.headers().get(HOST).and_then(|v| v.to_str().ok());
        Self::new(req.method().clone(), raw_target(req.uri()), host)
    }
}

/// Origin-form targets keep path and query; anything else is kept whole
fn raw_target(uri: &Uri) -> String {
    match (uri.scheme(), uri.path_and_query()) {
        (None, Some(pq)) => pq.as_str().to_string(),
        _ => uri.to_string(),
    }
}

/// Route a request
///
/// Validation failures and unknown paths are answered with a 400 response.
/// Only a request whose URL cannot be rebuilt yields an error.
pub fn route(req: &RouteRequest) -> Result<RouteResponse, RouterError> {
    if req.method == Method::OPTIONS {
        return Ok(RouteResponse::no_content());
    }

    let url = RequestUrl::parse(req.host.as_deref(), &req.target).map_err(|source| {
        RouterError::InvalidUrl {
            url: format!("{}{}", req.host.as_deref().unwrap_or_default(), req.target),
            source,
        }
    })?;

    if let Some(api) = match_route(&req.method, url.pathname(), API_ROUTES) {
        return Ok(dispatch(api.action, &url));
    }

    // NOTE: any query string reroutes to /consulta whatever the path was
    let path = if url.has_query() {
        CONSULTA_PATH
    } else {
        req.target.as_str()
    };

    Ok(match match_route(&req.method, path, TEXT_ROUTES) {
        Some(text) => dispatch(text.action, &url),
        None => RouteResponse::text(StatusCode::BAD_REQUEST, USAGE_HELP),
    })
}

fn dispatch(action: RouteAction, url: &RequestUrl) -> RouteResponse {
    match action {
        RouteAction::Sum => calculator::handle_sum(url),
        RouteAction::Consulta => RouteResponse::text(StatusCode::OK, consulta_message(url)),
        RouteAction::Text(body) => RouteResponse::text(StatusCode::OK, body),
    }
}

fn consulta_message(url: &RequestUrl) -> String {
    let value = |name: &str| {
        if url.has_query() {
            url.param(name).unwrap_or(MISSING_PLACEHOLDER).to_string()
        } else {
            String::new()
        }
    };

    format!(
        "Se hizo una consulta por query params, y los parametros recibidos fueron \
         Nombre: {}, Apelllido: {}, y Cedula: {}",
        value("nombre"),
        value("apellido"),
        value("cedula"),
    )
}

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub fn handle_request<B>(
    req: &Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let route_req = RouteRequest::from_hyper(req);
    logger::log_request_target(
        &route_req.target,
        state.config.logging.show_request_target,
    );

    let response = route(&route_req).unwrap_or_else(|e| {
        logger::log_error(&e.to_string());
        RouteResponse::bad_request()
    });

    if state.access_log() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            route_req.method.to_string(),
            route_req.target,
        );
        entry.http_version = http_version(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body_len();
        entry.user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    response.into_response()
}

const fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
