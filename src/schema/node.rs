use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate used by [`Schema::refine`].
pub type RefineFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Value mapping used by [`Schema::transform`] and [`Schema::preprocess`].
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
/// Deferred schema constructor used by [`Schema::lazy`].
pub type LazyFn = Arc<dyn Fn() -> Schema + Send + Sync>;

/// Post-processing attached to a schema node.
#[derive(Clone)]
pub enum Effect {
    /// Extra check run on the parsed value; failure reports `message`
    Refinement { check: RefineFn, message: String },
    /// Maps the parsed value to a new value
    Transform(TransformFn),
    /// Maps the raw input before the inner schema parses it
    Preprocess(TransformFn),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Refinement { message, .. } => {
                f.debug_struct("Refinement").field("message", message).finish()
            }
            Effect::Transform(_) => f.write_str("Transform"),
            Effect::Preprocess(_) => f.write_str("Preprocess"),
        }
    }
}

#[derive(Clone)]
pub(crate) enum SchemaDef {
    String,
    Number { integer: bool, coerce: bool },
    Boolean { coerce: bool },
    BigInt { coerce: bool },
    Date { coerce: bool },
    Literal(Value),
    Enum(Vec<String>),
    NativeEnum(Vec<(String, Value)>),
    Union(Vec<Schema>),
    Intersection(Schema, Schema),
    Object(Vec<(String, Schema)>),
    Array(Schema),
    Record(Schema),
    Nullable(Schema),
    Optional(Schema),
    Default(Schema, Value),
    Lazy(LazyFn),
    Effects(Schema, Effect),
    Void,
    Undefined,
    Never,
    Unknown,
}

/// A validation schema node.
///
/// Nodes are immutable and cheap to clone; builder methods return new nodes
/// wrapping or replacing the receiver.
///
/// ```
/// use action_router::schema::Schema;
/// use serde_json::json;
///
/// let post = Schema::object([
///     ("title", Schema::string()),
///     ("views", Schema::integer().coerce().optional()),
/// ]);
/// let parsed = post.safe_parse(&json!({"title": "Hi", "views": "3"})).unwrap();
/// assert_eq!(parsed, json!({"title": "Hi", "views": 3}));
/// ```
#[derive(Clone)]
pub struct Schema {
    pub(crate) def: Arc<SchemaDef>,
    pub(crate) description: Option<Arc<str>>,
}

/// Guard for walking chains of lazy nodes.
pub(crate) const MAX_LAZY_DEPTH: usize = 64;

impl Schema {
    fn from_def(def: SchemaDef) -> Self {
        Schema {
            def: Arc::new(def),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::from_def(SchemaDef::String)
    }

    pub fn number() -> Self {
        Self::from_def(SchemaDef::Number {
            integer: false,
            coerce: false,
        })
    }

    pub fn integer() -> Self {
        Self::from_def(SchemaDef::Number {
            integer: true,
            coerce: false,
        })
    }

    pub fn boolean() -> Self {
        Self::from_def(SchemaDef::Boolean { coerce: false })
    }

    pub fn bigint() -> Self {
        Self::from_def(SchemaDef::BigInt { coerce: false })
    }

    /// ISO-8601 date or date-time carried as a string.
    pub fn date() -> Self {
        Self::from_def(SchemaDef::Date { coerce: false })
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_def(SchemaDef::Literal(value.into()))
    }

    /// Enumeration of string values.
    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::from_def(SchemaDef::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// Enumeration of named members whose values may be strings or numbers.
    pub fn native_enum<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::from_def(SchemaDef::NativeEnum(
            members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn union(members: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_def(SchemaDef::Union(members.into_iter().collect()))
    }

    pub fn intersection(left: Schema, right: Schema) -> Self {
        Self::from_def(SchemaDef::Intersection(left, right))
    }

    /// Object with fields in declaration order.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self::from_def(SchemaDef::Object(
            fields.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        ))
    }

    pub fn array(items: Schema) -> Self {
        Self::from_def(SchemaDef::Array(items))
    }

    /// Object with arbitrary keys whose values all match `values`.
    pub fn record(values: Schema) -> Self {
        Self::from_def(SchemaDef::Record(values))
    }

    pub fn void() -> Self {
        Self::from_def(SchemaDef::Void)
    }

    pub fn undefined() -> Self {
        Self::from_def(SchemaDef::Undefined)
    }

    pub fn never() -> Self {
        Self::from_def(SchemaDef::Never)
    }

    pub fn unknown() -> Self {
        Self::from_def(SchemaDef::Unknown)
    }

    /// Schema built on first use; allows recursive definitions.
    pub fn lazy(getter: impl Fn() -> Schema + Send + Sync + 'static) -> Self {
        Self::from_def(SchemaDef::Lazy(Arc::new(getter)))
    }

    /// Run `f` on the raw input before `inner` parses it.
    pub fn preprocess(f: impl Fn(Value) -> Value + Send + Sync + 'static, inner: Schema) -> Self {
        Self::from_def(SchemaDef::Effects(inner, Effect::Preprocess(Arc::new(f))))
    }

    #[must_use]
    pub fn optional(self) -> Self {
        Self::from_def(SchemaDef::Optional(self))
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        Self::from_def(SchemaDef::Nullable(self))
    }

    /// Value substituted when the input is missing.
    #[must_use]
    pub fn default_value(self, value: impl Into<Value>) -> Self {
        Self::from_def(SchemaDef::Default(self, value.into()))
    }

    #[must_use]
    pub fn refine(
        self,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self::from_def(SchemaDef::Effects(
            self,
            Effect::Refinement {
                check: Arc::new(check),
                message: message.into(),
            },
        ))
    }

    #[must_use]
    pub fn transform(self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self::from_def(SchemaDef::Effects(self, Effect::Transform(Arc::new(f))))
    }

    /// Accept string input for number, boolean, bigint and date nodes.
    ///
    /// Other nodes are returned unchanged.
    #[must_use]
    pub fn coerce(self) -> Self {
        let def = match &*self.def {
            SchemaDef::Number { integer, .. } => SchemaDef::Number {
                integer: *integer,
                coerce: true,
            },
            SchemaDef::Boolean { .. } => SchemaDef::Boolean { coerce: true },
            SchemaDef::BigInt { .. } => SchemaDef::BigInt { coerce: true },
            SchemaDef::Date { .. } => SchemaDef::Date { coerce: true },
            _ => return self,
        };
        Schema {
            def: Arc::new(def),
            description: self.description,
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Arc::from(description.into()));
        self
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether a missing value is accepted by this node.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.is_optional_at(0)
    }

    fn is_optional_at(&self, depth: usize) -> bool {
        if depth > MAX_LAZY_DEPTH {
            return false;
        }
        match &*self.def {
            SchemaDef::Optional(_)
            | SchemaDef::Default(..)
            | SchemaDef::Void
            | SchemaDef::Undefined
            | SchemaDef::Unknown => true,
            SchemaDef::Nullable(inner) | SchemaDef::Effects(inner, _) => {
                inner.is_optional_at(depth + 1)
            }
            SchemaDef::Lazy(getter) => getter().is_optional_at(depth + 1),
            SchemaDef::Union(members) => members.iter().any(|m| m.is_optional_at(depth + 1)),
            _ => false,
        }
    }

    /// Field list when this node is an object (no unwrapping).
    #[must_use]
    pub fn fields(&self) -> Option<&[(String, Schema)]> {
        match &*self.def {
            SchemaDef::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match &*self.def {
            SchemaDef::String => "string",
            SchemaDef::Number { integer: true, .. } => "integer",
            SchemaDef::Number { .. } => "number",
            SchemaDef::Boolean { .. } => "boolean",
            SchemaDef::BigInt { .. } => "bigint",
            SchemaDef::Date { .. } => "date",
            SchemaDef::Literal(_) => "literal",
            SchemaDef::Enum(_) => "enum",
            SchemaDef::NativeEnum(_) => "native_enum",
            SchemaDef::Union(_) => "union",
            SchemaDef::Intersection(..) => "intersection",
            SchemaDef::Object(_) => "object",
            SchemaDef::Array(_) => "array",
            SchemaDef::Record(_) => "record",
            SchemaDef::Nullable(_) => "nullable",
            SchemaDef::Optional(_) => "optional",
            SchemaDef::Default(..) => "default",
            SchemaDef::Lazy(_) => "lazy",
            SchemaDef::Effects(..) => "effects",
            SchemaDef::Void => "void",
            SchemaDef::Undefined => "undefined",
            SchemaDef::Never => "never",
            SchemaDef::Unknown => "unknown",
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Schema");
        s.field("kind", &self.kind_name());
        if let SchemaDef::Object(fields) = &*self.def {
            let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
            s.field("fields", &keys);
        }
        if let Some(d) = &self.description {
            s.field("description", d);
        }
        s.finish()
    }
}
