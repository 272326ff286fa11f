//! Capability interface over schema nodes, and the classification helpers the
//! OpenAPI builder relies on.
//!
//! The helpers here never look at a concrete schema library. Anything that can
//! describe one level of itself through [`SchemaView`] and render a structural
//! schema can be introspected; [`Schema`](super::Schema) is the built-in adapter.

use super::node::{Effect, Schema, SchemaDef};
use serde_json::Value;
use tracing::warn;

/// Upper bound on wrapper layers stripped by [`unwrap`].
///
/// A cyclic chain of lazy nodes would otherwise never reach a fixed point.
pub const MAX_UNWRAP_DEPTH: usize = 64;

/// Kind of post-processing an effects wrapper applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Refinement,
    Transform,
    Preprocess,
}

/// One level of a schema node: either a wrapper around an inner node or a
/// structural type.
#[derive(Debug, Clone)]
pub enum SchemaView<S> {
    Optional(S),
    Default(S),
    /// Lazy node with its getter already evaluated
    Lazy(S),
    Effects(EffectKind, S),
    Void,
    Undefined,
    Never,
    String,
    Number,
    Boolean,
    BigInt,
    Date,
    Literal(Value),
    Enum(Vec<String>),
    NativeEnum(Vec<Value>),
    Union(Vec<S>),
    Intersection(S, S),
    Object(Vec<(String, S)>),
    /// Any type the introspection helpers do not distinguish (arrays, records, ...)
    Other,
}

impl<S> SchemaView<S> {
    /// Convert the inner nodes, keeping the classification.
    ///
    /// Lets an adapter that wraps another library reuse that library's view.
    pub fn map<T>(self, mut f: impl FnMut(S) -> T) -> SchemaView<T> {
        match self {
            SchemaView::Optional(s) => SchemaView::Optional(f(s)),
            SchemaView::Default(s) => SchemaView::Default(f(s)),
            SchemaView::Lazy(s) => SchemaView::Lazy(f(s)),
            SchemaView::Effects(kind, s) => SchemaView::Effects(kind, f(s)),
            SchemaView::Void => SchemaView::Void,
            SchemaView::Undefined => SchemaView::Undefined,
            SchemaView::Never => SchemaView::Never,
            SchemaView::String => SchemaView::String,
            SchemaView::Number => SchemaView::Number,
            SchemaView::Boolean => SchemaView::Boolean,
            SchemaView::BigInt => SchemaView::BigInt,
            SchemaView::Date => SchemaView::Date,
            SchemaView::Literal(v) => SchemaView::Literal(v),
            SchemaView::Enum(values) => SchemaView::Enum(values),
            SchemaView::NativeEnum(values) => SchemaView::NativeEnum(values),
            SchemaView::Union(members) => SchemaView::Union(members.into_iter().map(f).collect()),
            SchemaView::Intersection(l, r) => {
                let l = f(l);
                SchemaView::Intersection(l, f(r))
            }
            SchemaView::Object(fields) => {
                SchemaView::Object(fields.into_iter().map(|(k, s)| (k, f(s))).collect())
            }
            SchemaView::Other => SchemaView::Other,
        }
    }
}

/// What a schema library must expose to be introspected.
pub trait IntrospectSchema: Clone {
    /// Classify this node one level deep.
    fn view(&self) -> SchemaView<Self>;

    /// Whether the node accepts a missing value.
    fn is_optional(&self) -> bool;

    /// Fully inlined JSON Schema description of the node.
    fn to_structural_schema(&self) -> Value;

    /// Whether the library can coerce string input into scalars.
    fn supports_coercion() -> bool {
        true
    }
}

impl IntrospectSchema for Schema {
    fn view(&self) -> SchemaView<Self> {
        match &*self.def {
            SchemaDef::Optional(inner) => SchemaView::Optional(inner.clone()),
            SchemaDef::Default(inner, _) => SchemaView::Default(inner.clone()),
            SchemaDef::Lazy(getter) => SchemaView::Lazy(getter()),
            SchemaDef::Effects(inner, effect) => {
                let kind = match effect {
                    Effect::Refinement { .. } => EffectKind::Refinement,
                    Effect::Transform(_) => EffectKind::Transform,
                    Effect::Preprocess(_) => EffectKind::Preprocess,
                };
                SchemaView::Effects(kind, inner.clone())
            }
            SchemaDef::Void => SchemaView::Void,
            SchemaDef::Undefined => SchemaView::Undefined,
            SchemaDef::Never => SchemaView::Never,
            SchemaDef::String => SchemaView::String,
            SchemaDef::Number { .. } => SchemaView::Number,
            SchemaDef::Boolean { .. } => SchemaView::Boolean,
            SchemaDef::BigInt { .. } => SchemaView::BigInt,
            SchemaDef::Date { .. } => SchemaView::Date,
            SchemaDef::Literal(v) => SchemaView::Literal(v.clone()),
            SchemaDef::Enum(values) => SchemaView::Enum(values.clone()),
            SchemaDef::NativeEnum(members) => {
                SchemaView::NativeEnum(members.iter().map(|(_, v)| v.clone()).collect())
            }
            SchemaDef::Union(members) => SchemaView::Union(members.clone()),
            SchemaDef::Intersection(l, r) => SchemaView::Intersection(l.clone(), r.clone()),
            SchemaDef::Object(fields) => SchemaView::Object(fields.clone()),
            SchemaDef::Array(_)
            | SchemaDef::Record(_)
            | SchemaDef::Nullable(_)
            | SchemaDef::Unknown => SchemaView::Other,
        }
    }

    fn is_optional(&self) -> bool {
        Schema::is_optional(self)
    }

    fn to_structural_schema(&self) -> Value {
        self.to_json_schema()
    }
}

/// Strip optional, default, lazy, refinement and transform wrappers (and
/// preprocess wrappers when `unwrap_preprocess` is set) until a structural node
/// is reached.
pub fn unwrap<S: IntrospectSchema>(schema: &S, unwrap_preprocess: bool) -> S {
    let mut current = schema.clone();
    for _ in 0..MAX_UNWRAP_DEPTH {
        current = match current.view() {
            SchemaView::Optional(inner) | SchemaView::Default(inner) | SchemaView::Lazy(inner) => {
                inner
            }
            SchemaView::Effects(EffectKind::Refinement | EffectKind::Transform, inner) => inner,
            SchemaView::Effects(EffectKind::Preprocess, inner) if unwrap_preprocess => inner,
            _ => return current,
        };
    }
    warn!(
        max_depth = MAX_UNWRAP_DEPTH,
        "Schema unwrap did not reach a structural node; possible cyclic lazy schema"
    );
    current
}

/// Void, undefined or never: the node accepts no meaningful value.
pub fn is_void_like<S: IntrospectSchema>(schema: &S) -> bool {
    matches!(
        schema.view(),
        SchemaView::Void | SchemaView::Undefined | SchemaView::Never
    )
}

/// Fields of an object node, in declaration order (no unwrapping).
pub fn object_fields<S: IntrospectSchema>(schema: &S) -> Option<Vec<(String, S)>> {
    match schema.view() {
        SchemaView::Object(fields) => Some(fields),
        _ => None,
    }
}

/// Inner node of an optional wrapper (no further unwrapping).
pub fn optional_inner<S: IntrospectSchema>(schema: &S) -> Option<S> {
    match schema.view() {
        SchemaView::Optional(inner) => Some(inner),
        _ => None,
    }
}

/// Whether values of this node can be rendered as a plain string parameter.
pub fn is_string_like<S: IntrospectSchema>(schema: &S) -> bool {
    match unwrap(schema, false).view() {
        // The coerced output type is unknown, so assume the raw input is a string.
        SchemaView::Effects(EffectKind::Preprocess, _) => true,
        SchemaView::Union(members) => members.iter().all(is_string_like),
        SchemaView::Intersection(left, right) => is_string_like(&left) && is_string_like(&right),
        SchemaView::Literal(value) => value.is_string(),
        SchemaView::Enum(_) | SchemaView::String => true,
        SchemaView::NativeEnum(values) => !values.iter().any(Value::is_number),
        _ => false,
    }
}

/// Number, boolean, bigint or date: scalars a string parameter can be coerced into.
pub fn is_coercible<S: IntrospectSchema>(schema: &S) -> bool {
    matches!(
        unwrap(schema, false).view(),
        SchemaView::Number | SchemaView::Boolean | SchemaView::BigInt | SchemaView::Date
    )
}
