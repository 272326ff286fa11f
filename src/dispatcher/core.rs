use crate::action::ActionResult;
use crate::ids::RequestId;
use crate::router::{RouteMethod, RouteTable};
use http::{Method, StatusCode};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Status and JSON body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// `{"message": message}` with the given status
    #[must_use]
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, json!({ "message": message }))
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND, "Route not found")
    }
}

/// Map an action result onto an HTTP response.
///
/// * `data` → 200 with the data as body
/// * `validationErrors` → 400 with `{message, validationErrors}`
/// * `serverError` → the error's status (500 when unset or invalid) with `{message, code?}`
#[must_use]
pub fn handle_result(result: ActionResult) -> HandlerResponse {
    match result {
        ActionResult::Data(data) => HandlerResponse::json(StatusCode::OK, data),
        ActionResult::ValidationErrors(tree) => HandlerResponse::json(
            StatusCode::BAD_REQUEST,
            json!({ "message": "Validation failed", "validationErrors": tree }),
        ),
        ActionResult::ServerError(error) => {
            let status = error
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = serde_json::to_value(&error)
                .unwrap_or_else(|_| json!({ "message": error.message }));
            HandlerResponse::json(status, body)
        }
    }
}

/// Parse a request URL that is either absolute or a path starting with `/`.
///
/// Relative paths such as `posts/1` and URLs without a hierarchical path
/// (`mailto:...`) are rejected.
#[must_use]
pub fn parse_request_url(url: &str) -> Option<Url> {
    if url.starts_with('/') {
        return Url::parse(&format!("http://dummy{url}")).ok();
    }
    Url::parse(url).ok().filter(|parsed| !parsed.cannot_be_a_base())
}

/// Parse a JSON request body; missing or blank bodies are an empty object.
fn parse_body(body: Option<&[u8]>) -> Result<Map<String, Value>, &'static str> {
    let Some(bytes) = body.filter(|b| !b.iter().all(u8::is_ascii_whitespace)) else {
        return Ok(Map::new());
    };
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("Request body must be a JSON object"),
        Err(_) => Err("Invalid JSON body"),
    }
}

/// Routes requests to registered actions and shapes their results.
///
/// Holds the same `Arc<RouteTable>` the document generator reads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// Dispatch one request under a fresh request id.
    #[must_use]
    pub fn handle(&self, method: &Method, url: &str, body: Option<&[u8]>) -> HandlerResponse {
        self.handle_with_request_id(RequestId::new(), method, url, body)
    }

    /// Dispatch one request.
    ///
    /// The action input is built from path parameters, then query parameters,
    /// then (for POST and PUT) the JSON body; later sources win on key
    /// collisions.
    ///
    /// # Arguments
    ///
    /// * `request_id` - Id attached to every log event of this dispatch
    /// * `method` - HTTP method; only GET, POST, PUT and DELETE are routed
    /// * `url` - Absolute URL or path with optional query string
    /// * `body` - Raw request body, ignored for GET and DELETE
    #[must_use]
    pub fn handle_with_request_id(
        &self,
        request_id: RequestId,
        method: &Method,
        url: &str,
        body: Option<&[u8]>,
    ) -> HandlerResponse {
        let start = Instant::now();

        let Some(route_method) = RouteMethod::from_http(method) else {
            warn!(request_id = %request_id, method = %method, url = %url, "Unsupported method");
            return HandlerResponse::not_found();
        };

        let Some(parsed_url) = parse_request_url(url) else {
            warn!(request_id = %request_id, url = %url, "Unparseable request URL");
            return HandlerResponse::error(StatusCode::BAD_REQUEST, "Invalid request URL");
        };

        let Some(route) = self.routes.route(route_method, parsed_url.path()) else {
            return HandlerResponse::not_found();
        };

        let mut input = Map::new();
        for (name, value) in &route.path_params {
            input.insert(name.to_string(), Value::String(value.clone()));
        }
        for (name, value) in parsed_url.query_pairs() {
            input.insert(name.into_owned(), Value::String(value.into_owned()));
        }
        if route_method.accepts_body() {
            match parse_body(body) {
                Ok(fields) => input.extend(fields),
                Err(message) => {
                    warn!(
                        request_id = %request_id,
                        route_pattern = %route.template,
                        reason = message,
                        "Rejected request body"
                    );
                    return HandlerResponse::error(StatusCode::BAD_REQUEST, message);
                }
            }
        }

        debug!(
            request_id = %request_id,
            route_pattern = %route.template,
            input_keys = input.len(),
            "Invoking action"
        );

        let result = route.config.handler.call(Some(Value::Object(input)));
        let response = handle_result(result);

        info!(
            request_id = %request_id,
            method = %route_method,
            path = %parsed_url.path(),
            route_pattern = %route.template,
            status = response.status.as_u16(),
            duration_us = start.elapsed().as_micros(),
            "Request dispatched"
        );
        response
    }
}
