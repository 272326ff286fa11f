//! # Dispatcher Module
//!
//! Turns untyped HTTP requests into action calls and action results into
//! HTTP responses.
//!
//! ## Request Flow
//!
//! 1. The URL is parsed (absolute or path-only) and the path is matched
//!    against the shared [`RouteTable`](crate::router::RouteTable)
//! 2. Path parameters, query parameters and (for POST/PUT) the JSON body are
//!    merged into one input object, later sources winning
//! 3. The route's handler runs with that input
//! 4. The [`ActionResult`](crate::action::ActionResult) is mapped to a status
//!    and JSON body
//!
//! ## Error Handling
//!
//! - No matching route or an unsupported method returns 404 `{"message": "Route not found"}`
//! - A body that is not a JSON object returns 400
//! - Validation failures return 400 with the nested `validationErrors` tree
//! - Server errors return their own status, 500 by default

mod core;

pub use core::{handle_result, parse_request_url, Dispatcher, HandlerResponse};
