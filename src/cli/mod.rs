//! # CLI Module
//!
//! Command-line front-end over the demo blog actions.
//!
//! ## Commands
//!
//! ### `spec`
//!
//! Print the generated OpenAPI document:
//!
//! ```bash
//! action-router spec --format yaml --output openapi.yaml
//! ```
//!
//! ### `route`
//!
//! Resolve a request path without invoking anything; exits non-zero when no
//! route matches:
//!
//! ```bash
//! action-router route GET /posts/42
//! ```
//!
//! ### `invoke`
//!
//! Dispatch a request and print the status line and JSON body:
//!
//! ```bash
//! action-router invoke POST /posts --body '{"title":"Hi","body":"..."}'
//! action-router invoke GET '/posts?q=rout&limit=1'
//! ```
//!
//! `--config FILE` applies to every command and sets the API info and path
//! prefix (see [`crate::config`]).

mod commands;


pub use commands::{run_cli, Cli, Commands, OutputFormat};
