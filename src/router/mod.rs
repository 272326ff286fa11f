//! # Router Module
//!
//! Path matching and route resolution for registered actions.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route templates with `{name}` placeholders
//! - Keeping the table of actions keyed by path and method
//! - Matching incoming request paths to registered routes
//! - Extracting path parameters from matched routes
//!
//! ## Matching
//!
//! A template and a request path are both split on `/`. Segment counts must
//! agree; placeholders bind the raw request segment and literal segments must
//! match exactly (case-sensitive). Routes are tried in registration order and
//! the first one that matches *and* has the requested method wins.
//!
//! ## Example
//!
//! ```rust
//! use action_router::router::{RouteMethod, RouteTable};
//! use action_router::action::ActionClient;
//! use action_router::schema::Schema;
//! use std::sync::Arc;
//!
//! let client = ActionClient::new();
//! let get_post = Arc::new(client.action(
//!     Schema::object([("postId", Schema::string())]),
//!     |input, _ctx| Ok(Some(input)),
//! ));
//!
//! let mut table = RouteTable::new();
//! table.get_action("/posts/{postId}", get_post).unwrap();
//!
//! let m = table.route(RouteMethod::Get, "/posts/42").unwrap();
//! assert_eq!(m.get_path_param("postId"), Some("42"));
//! assert!(table.route(RouteMethod::Delete, "/posts/42").is_none());
//! ```

mod core;
mod path;

pub use core::{PathRoutes, RouteConfig, RouteMatch, RouteMethod, RouteTable};
pub use path::{ParamVec, PathTemplate, TemplateError, MAX_INLINE_PARAMS};
