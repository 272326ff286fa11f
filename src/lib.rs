//! # action-router
//!
//! Typed remote procedures ("actions") exposed over untyped HTTP, with an
//! OpenAPI document synthesized from the schemas already attached to each
//! action.
//!
//! ## Overview
//!
//! An action couples an input [`schema::Schema`] with server code. The crate
//! validates untrusted input against that schema, routes requests to actions
//! by matching URL templates with `{name}` placeholders, and generates an
//! OpenAPI 3.0 document by introspecting the same schemas, so there is no
//! separately maintained spec to drift.
//!
//! ## Architecture
//!
//! - **[`schema`]** - Schema builders, validation, JSON Schema rendering and the
//!   [`schema::IntrospectSchema`] capability interface
//! - **[`validator`]** - Validation issues and the nested error tree built from them
//! - **[`action`]** - Action client: validate, run middleware and server code, shape results
//! - **[`router`]** - Path templates and the route table
//! - **[`spec`]** - OpenAPI document generation from a route table
//! - **[`dispatcher`]** - Request dispatch: URL parsing, input merging, HTTP status mapping
//! - **[`config`]** - API info and path prefix from TOML and environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`ids`]** - Request identifiers
//! - **[`demo`]** - In-memory blog actions used by the CLI
//! - **[`cli`]** - `action-router` command-line front-end
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher
//!     participant RouteTable
//!     participant Action
//!
//!     Caller->>Dispatcher: handle(method, url, body)
//!     Dispatcher->>RouteTable: route(method, path)
//!     RouteTable-->>Dispatcher: RouteMatch { path_params }
//!     Dispatcher->>Action: call(path ⊕ query ⊕ body)
//!     Action->>Action: safe_parse(input)
//!     alt invalid input
//!         Action-->>Dispatcher: validationErrors
//!     else valid input
//!         Action->>Action: middleware → server code
//!         Action-->>Dispatcher: data | serverError
//!     end
//!     Dispatcher-->>Caller: HandlerResponse { status, body }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use action_router::action::{ActionClient, ActionMetadata};
//! use action_router::config::ApiInfo;
//! use action_router::router::RouteTable;
//! use action_router::schema::Schema;
//! use action_router::spec::generate_openapi_document;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let client = ActionClient::new();
//! let get_post = client
//!     .action(Schema::object([("postId", Schema::string())]), |input, _| {
//!         Ok(Some(json!({ "title": format!("Post {}", input["postId"]) })))
//!     })
//!     .output(Schema::object([("title", Schema::string())]))
//!     .metadata(ActionMetadata::new("getPost"));
//!
//! let mut routes = RouteTable::new();
//! routes.get_action("/posts/{postId}", Arc::new(get_post))?;
//!
//! let document = generate_openapi_document(&routes, &ApiInfo::new("Blog", "1.0.0"))?;
//! assert!(document.paths.get("/posts/{postId}").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod cli;
pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod router;
pub mod schema;
pub mod spec;
pub mod validator;

pub use action::{Action, ActionClient, ActionResult};
pub use router::{RouteMethod, RouteTable};
pub use spec::{generate_openapi_document, OpenApiDocument};
