//! # Action Module
//!
//! Typed remote procedures bound to an input schema.
//!
//! An [`ActionClient`] carries the behaviour shared by every action it
//! builds: the middleware producing a context, the server-error log hook and
//! the mapping of errors to what callers see. [`Action::execute`] runs one
//! call end to end:
//!
//! 1. validate the raw input; on failure return `validationErrors` shaped
//!    like the input
//! 2. run middleware on the parsed input to obtain the context
//! 3. run the server code; `Ok(None)` becomes `data: null`
//! 4. on any error, log it and return `serverError`
//!
//! Actions are also [`SchemaSource`]s, which is what the router and the
//! document generator read their contract from.

mod core;
mod source;

pub use core::{
    Action, ActionClient, ActionResult, MiddlewareFn, ReturnedServerErrorFn, ServerCodeFn,
    ServerError, ServerErrorLogFn, DEFAULT_SERVER_ERROR,
};
pub use source::{ActionHandler, ActionMetadata, ActionSchemas, SchemaSource};
