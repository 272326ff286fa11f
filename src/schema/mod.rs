//! # Schema Module
//!
//! A small validation-schema library and the introspection layer the OpenAPI
//! builder is written against.
//!
//! - [`Schema`] builds schema trees (`string`, `object`, `optional`, `lazy`, ...),
//!   validates untrusted JSON with [`Schema::safe_parse`] and renders inlined
//!   JSON Schema with [`Schema::to_json_schema`].
//! - [`IntrospectSchema`] is the capability set the builder needs from any schema
//!   library: classify one level of a node, report optionality and render a
//!   structural schema. [`unwrap`], [`is_string_like`], [`is_coercible`] and
//!   [`is_void_like`] are written purely in terms of it.
//!
//! ```
//! use action_router::schema::{self, Schema};
//!
//! let id = Schema::string().describe("Post id").optional();
//! let bare = schema::unwrap(&id, true);
//! assert!(schema::is_string_like(&bare));
//! assert!(!schema::is_coercible(&bare));
//! ```

mod introspect;
mod node;
mod parse;
mod render;

pub use introspect::{
    is_coercible, is_string_like, is_void_like, object_fields, optional_inner, unwrap,
    EffectKind, IntrospectSchema, SchemaView, MAX_UNWRAP_DEPTH,
};
pub use node::{Effect, LazyFn, RefineFn, Schema, TransformFn};
