//! Structural (JSON Schema) rendering of [`Schema`] nodes.
//!
//! The output targets OpenAPI 3.0 schema objects: everything is inlined (no
//! `$ref`), literals become single-value `enum`s and nullability is expressed
//! with `nullable: true`.

use super::node::{Schema, SchemaDef, MAX_LAZY_DEPTH};
use serde_json::{json, Map, Value};

impl Schema {
    /// Render this node as an inlined JSON Schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        render(self, 0)
    }
}

fn render(schema: &Schema, depth: usize) -> Value {
    // Recursive lazy definitions bottom out as an unconstrained schema.
    if depth > MAX_LAZY_DEPTH {
        return json!({});
    }
    let next = depth + 1;

    let mut out = match &*schema.def {
        SchemaDef::String => json!({"type": "string"}),
        SchemaDef::Number { integer: true, .. } => json!({"type": "integer"}),
        SchemaDef::Number { .. } => json!({"type": "number"}),
        SchemaDef::Boolean { .. } => json!({"type": "boolean"}),
        SchemaDef::BigInt { .. } => json!({"type": "integer", "format": "int64"}),
        SchemaDef::Date { .. } => json!({"type": "string", "format": "date-time"}),
        SchemaDef::Literal(value) => render_enum(std::slice::from_ref(value)),
        SchemaDef::Enum(values) => json!({"type": "string", "enum": values}),
        SchemaDef::NativeEnum(members) => {
            let values: Vec<Value> = members.iter().map(|(_, v)| v.clone()).collect();
            render_enum(&values)
        }
        SchemaDef::Union(members) => {
            let literals: Option<Vec<Value>> = members
                .iter()
                .map(|m| match &*m.def {
                    SchemaDef::Literal(v @ Value::String(_)) => Some(v.clone()),
                    _ => None,
                })
                .collect();
            match literals {
                Some(values) if !values.is_empty() => json!({"type": "string", "enum": values}),
                _ => {
                    let any_of: Vec<Value> = members.iter().map(|m| render(m, next)).collect();
                    json!({"anyOf": any_of})
                }
            }
        }
        SchemaDef::Intersection(left, right) => {
            json!({"allOf": [render(left, next), render(right, next)]})
        }
        SchemaDef::Object(fields) => {
            let mut properties = Map::new();
            let mut required = Vec::new();
            for (name, field) in fields {
                properties.insert(name.clone(), render(field, next));
                if !field.is_optional() {
                    required.push(Value::String(name.clone()));
                }
            }
            let mut obj = Map::new();
            obj.insert("type".to_string(), json!("object"));
            obj.insert("properties".to_string(), Value::Object(properties));
            if !required.is_empty() {
                obj.insert("required".to_string(), Value::Array(required));
            }
            Value::Object(obj)
        }
        SchemaDef::Array(items) => json!({"type": "array", "items": render(items, next)}),
        SchemaDef::Record(values) => {
            json!({"type": "object", "additionalProperties": render(values, next)})
        }
        SchemaDef::Nullable(inner) => {
            let mut rendered = render(inner, next);
            if let Value::Object(map) = &mut rendered {
                map.insert("nullable".to_string(), Value::Bool(true));
            }
            rendered
        }
        SchemaDef::Optional(inner) | SchemaDef::Effects(inner, _) => render(inner, next),
        SchemaDef::Default(inner, value) => {
            let mut rendered = render(inner, next);
            if let Value::Object(map) = &mut rendered {
                map.insert("default".to_string(), value.clone());
            }
            rendered
        }
        SchemaDef::Lazy(getter) => render(&getter(), next),
        SchemaDef::Void | SchemaDef::Unknown => json!({}),
        SchemaDef::Undefined | SchemaDef::Never => json!({"not": {}}),
    };

    if let (Some(description), Value::Object(map)) = (&schema.description, &mut out) {
        map.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    out
}

fn render_enum(values: &[Value]) -> Value {
    let kind = if values.iter().all(Value::is_string) {
        Some("string")
    } else if values.iter().all(Value::is_number) {
        Some("number")
    } else if values.iter().all(Value::is_boolean) {
        Some("boolean")
    } else {
        None
    };
    match kind {
        Some(kind) => json!({"type": kind, "enum": values}),
        None => json!({"enum": values}),
    }
}
