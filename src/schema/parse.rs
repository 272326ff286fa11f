//! Input validation for [`Schema`] nodes.
//!
//! Parsing walks the schema and the input side by side, collecting every
//! failure as a [`ValidationIssue`] with the exact path of the offending value.
//! A missing value (an absent object key, or no input at all) is modelled as
//! `None` so optional and default wrappers can tell it apart from `null`.

use super::node::{Effect, Schema, SchemaDef, MAX_LAZY_DEPTH};
use crate::validator::{PathKey, ValidationIssue};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::warn;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([Tt ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?([Zz]|[+-]\d{2}:?\d{2})?)?$")
        .expect("ISO date pattern is valid")
});

impl Schema {
    /// Validate `input`, returning the parsed value or every issue found.
    pub fn safe_parse(&self, input: &Value) -> Result<Value, Vec<ValidationIssue>> {
        self.safe_parse_optional(Some(input))
            .map(|parsed| parsed.unwrap_or(Value::Null))
    }

    /// Validate a possibly-missing input.
    ///
    /// `Ok(None)` means the schema accepted the missing value without producing one.
    pub fn safe_parse_optional(
        &self,
        input: Option<&Value>,
    ) -> Result<Option<Value>, Vec<ValidationIssue>> {
        let mut ctx = ParseCtx::default();
        let parsed = parse(self, input, &mut ctx);
        if ctx.issues.is_empty() {
            Ok(parsed)
        } else {
            Err(ctx.issues)
        }
    }
}

#[derive(Default)]
struct ParseCtx {
    path: Vec<PathKey>,
    issues: Vec<ValidationIssue>,
    /// Lazy getters expanded since the walk last stepped into the input.
    lazy_depth: usize,
}

impl ParseCtx {
    fn issue(&mut self, message: impl Into<String>) {
        self.issues
            .push(ValidationIssue::new(self.path.clone(), message));
    }

    fn expected(&mut self, expected: &str, received: &Value) {
        self.issue(format!(
            "Expected {expected}, received {}",
            type_name(received)
        ));
    }

    fn scoped<T>(&mut self, key: PathKey, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(key);
        let lazy_depth = std::mem::take(&mut self.lazy_depth);
        let out = f(self);
        self.lazy_depth = lazy_depth;
        self.path.pop();
        out
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse(schema: &Schema, input: Option<&Value>, ctx: &mut ParseCtx) -> Option<Value> {
    // Wrappers that decide what a missing value means.
    match &*schema.def {
        SchemaDef::Optional(inner) => return input.and_then(|v| parse(inner, Some(v), ctx)),
        SchemaDef::Default(inner, fallback) => {
            return parse(inner, Some(input.unwrap_or(fallback)), ctx)
        }
        SchemaDef::Nullable(inner) => {
            return match input {
                Some(Value::Null) => Some(Value::Null),
                other => parse(inner, other, ctx),
            }
        }
        SchemaDef::Lazy(getter) => {
            if ctx.lazy_depth >= MAX_LAZY_DEPTH {
                warn!(
                    max_depth = MAX_LAZY_DEPTH,
                    "Lazy schema never resolved while parsing; treating input as invalid"
                );
                ctx.issue("Invalid input");
                return None;
            }
            ctx.lazy_depth += 1;
            let parsed = parse(&getter(), input, ctx);
            ctx.lazy_depth -= 1;
            return parsed;
        }
        SchemaDef::Effects(inner, effect) => return parse_effect(inner, effect, input, ctx),
        SchemaDef::Void | SchemaDef::Undefined => {
            if let Some(value) = input {
                ctx.expected("undefined", value);
            }
            return None;
        }
        SchemaDef::Never => {
            ctx.issue("Invalid input");
            return None;
        }
        SchemaDef::Unknown => return input.cloned(),
        _ => {}
    }

    let Some(value) = input else {
        ctx.issue("Required");
        return None;
    };

    match &*schema.def {
        SchemaDef::String => match value {
            Value::String(_) => Some(value.clone()),
            other => {
                ctx.expected("string", other);
                None
            }
        },
        SchemaDef::Number { integer, coerce } => parse_number(value, *integer, *coerce, ctx),
        SchemaDef::Boolean { coerce } => match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(s) if *coerce => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => {
                    ctx.expected("boolean", value);
                    None
                }
            },
            other => {
                ctx.expected("boolean", other);
                None
            }
        },
        SchemaDef::BigInt { coerce } => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
            Value::String(s) if *coerce => match s.trim().parse::<i64>() {
                Ok(i) => Some(Value::from(i)),
                Err(_) => {
                    ctx.expected("bigint", value);
                    None
                }
            },
            other => {
                ctx.expected("bigint", other);
                None
            }
        },
        SchemaDef::Date { coerce } => match value {
            Value::String(s) if ISO_DATE.is_match(s) => Some(value.clone()),
            Value::String(_) => {
                ctx.issue("Invalid date");
                None
            }
            Value::Number(n) if *coerce && (n.is_i64() || n.is_u64()) => Some(value.clone()),
            other => {
                ctx.expected("date", other);
                None
            }
        },
        SchemaDef::Literal(expected) => {
            if value == expected {
                Some(value.clone())
            } else {
                ctx.issue(format!("Invalid literal value, expected {expected}"));
                None
            }
        }
        SchemaDef::Enum(options) => match value {
            Value::String(s) if options.iter().any(|o| o == s) => Some(value.clone()),
            other => {
                let expected: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
                ctx.issue(format!(
                    "Invalid enum value. Expected {}, received {}",
                    expected.join(" | "),
                    display_received(other)
                ));
                None
            }
        },
        SchemaDef::NativeEnum(members) => {
            if members.iter().any(|(_, v)| v == value) {
                Some(value.clone())
            } else {
                let expected: Vec<String> = members.iter().map(|(_, v)| v.to_string()).collect();
                ctx.issue(format!(
                    "Invalid enum value. Expected {}, received {}",
                    expected.join(" | "),
                    display_received(value)
                ));
                None
            }
        }
        SchemaDef::Union(members) => {
            for member in members {
                let mut attempt = ParseCtx {
                    path: ctx.path.clone(),
                    issues: Vec::new(),
                    lazy_depth: ctx.lazy_depth,
                };
                let parsed = parse(member, Some(value), &mut attempt);
                if attempt.issues.is_empty() {
                    return parsed;
                }
            }
            ctx.issue("Invalid input");
            None
        }
        SchemaDef::Intersection(left, right) => {
            let before = ctx.issues.len();
            let l = parse(left, Some(value), ctx);
            let r = parse(right, Some(value), ctx);
            if ctx.issues.len() > before {
                return None;
            }
            match (l, r) {
                (Some(Value::Object(mut a)), Some(Value::Object(b))) => {
                    a.extend(b);
                    Some(Value::Object(a))
                }
                (a, b) if a == b => a,
                _ => {
                    ctx.issue("Intersection results could not be merged");
                    None
                }
            }
        }
        SchemaDef::Object(fields) => {
            let Value::Object(obj) = value else {
                ctx.expected("object", value);
                return None;
            };
            let mut out = Map::new();
            for (name, field) in fields {
                let parsed = ctx.scoped(PathKey::Key(name.clone()), |ctx| {
                    parse(field, obj.get(name), ctx)
                });
                if let Some(v) = parsed {
                    out.insert(name.clone(), v);
                }
            }
            Some(Value::Object(out))
        }
        SchemaDef::Array(items) => {
            let Value::Array(elements) = value else {
                ctx.expected("array", value);
                return None;
            };
            let out: Vec<Value> = elements
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    ctx.scoped(PathKey::Index(i), |ctx| parse(items, Some(element), ctx))
                        .unwrap_or(Value::Null)
                })
                .collect();
            Some(Value::Array(out))
        }
        SchemaDef::Record(values) => {
            let Value::Object(obj) = value else {
                ctx.expected("object", value);
                return None;
            };
            let mut out = Map::new();
            for (key, element) in obj {
                let parsed = ctx.scoped(PathKey::Key(key.clone()), |ctx| {
                    parse(values, Some(element), ctx)
                });
                if let Some(v) = parsed {
                    out.insert(key.clone(), v);
                }
            }
            Some(Value::Object(out))
        }
        // Wrapper kinds returned above.
        _ => input.cloned(),
    }
}

fn parse_effect(
    inner: &Schema,
    effect: &Effect,
    input: Option<&Value>,
    ctx: &mut ParseCtx,
) -> Option<Value> {
    match effect {
        Effect::Preprocess(f) => {
            let pre = input.map(|v| f(v.clone()));
            parse(inner, pre.as_ref(), ctx)
        }
        Effect::Refinement { check, message } => {
            let before = ctx.issues.len();
            let parsed = parse(inner, input, ctx);
            if ctx.issues.len() == before {
                if let Some(v) = &parsed {
                    if !check(v) {
                        ctx.issue(message.clone());
                    }
                }
            }
            parsed
        }
        Effect::Transform(f) => {
            let before = ctx.issues.len();
            let parsed = parse(inner, input, ctx);
            if ctx.issues.len() == before {
                parsed.map(|v| f(v))
            } else {
                parsed
            }
        }
    }
}

fn parse_number(value: &Value, integer: bool, coerce: bool, ctx: &mut ParseCtx) -> Option<Value> {
    let number = match value {
        Value::Number(n) => n.clone(),
        Value::String(s) if coerce => {
            match s.trim().parse::<f64>().ok().and_then(number_from_f64) {
                Some(n) => n,
                None => {
                    ctx.expected("number", value);
                    return None;
                }
            }
        }
        other => {
            ctx.expected("number", other);
            return None;
        }
    };

    if integer && !(number.is_i64() || number.is_u64()) {
        let whole = number.as_f64().filter(|f| f.fract() == 0.0);
        return match whole {
            Some(f) if f.abs() < i64::MAX as f64 => Some(Value::from(f as i64)),
            _ => {
                ctx.issue("Expected integer, received float");
                None
            }
        };
    }
    Some(Value::Number(number))
}

fn number_from_f64(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

fn display_received(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}
