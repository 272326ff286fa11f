use super::*;
use crate::action::{ActionMetadata, ActionSchemas};
use crate::router::RouteMethod;
use crate::schema::{IntrospectSchema, Schema, SchemaView};
use serde_json::{json, Value};

/// Adapter for a schema library without string coercion.
#[derive(Clone)]
struct NoCoerce(Schema);

impl IntrospectSchema for NoCoerce {
    fn view(&self) -> SchemaView<Self> {
        self.0.view().map(NoCoerce)
    }

    fn is_optional(&self) -> bool {
        self.0.is_optional()
    }

    fn to_structural_schema(&self) -> Value {
        self.0.to_json_schema()
    }

    fn supports_coercion() -> bool {
        false
    }
}

fn params(schema: &Schema, path_params: &[&str], selector: ParameterSelector) -> Value {
    let built = build_parameters(Some(schema), path_params, selector).unwrap();
    serde_json::to_value(built).unwrap()
}

#[test]
fn test_path_and_query_parameters() {
    let schema = Schema::object([
        ("postId", Schema::string()),
        ("q", Schema::string().describe("Search text").optional()),
        ("limit", Schema::integer().coerce().optional()),
    ]);
    assert_eq!(
        params(&schema, &["postId"], ParameterSelector::All),
        json!([
            {"name": "postId", "in": "path", "required": true, "schema": {"type": "string"}},
            {"name": "q", "in": "query", "required": false, "schema": {"type": "string"}, "description": "Search text"},
            {"name": "limit", "in": "query", "required": false, "schema": {"type": "integer"}}
        ])
    );
}

#[test]
fn test_selector_filters() {
    let schema = Schema::object([("postId", Schema::string()), ("q", Schema::string())]);
    let path_only = params(&schema, &["postId"], ParameterSelector::Path);
    assert_eq!(path_only.as_array().map(Vec::len), Some(1));
    assert_eq!(path_only[0]["name"], "postId");
    let query_only = params(&schema, &["postId"], ParameterSelector::Query);
    assert_eq!(query_only.as_array().map(Vec::len), Some(1));
    assert_eq!(query_only[0]["name"], "q");
}

#[test]
fn test_optional_top_level_makes_query_params_optional() {
    let schema = Schema::object([("q", Schema::string())]).optional();
    let built = params(&schema, &[], ParameterSelector::All);
    assert_eq!(built[0]["required"], json!(false));
}

#[test]
fn test_void_input_without_path_params_has_no_parameters() {
    assert_eq!(
        build_parameters(Some(&Schema::void()), &[], ParameterSelector::All),
        Ok(None)
    );
    assert_eq!(
        build_parameters(Some(&Schema::void().optional()), &[], ParameterSelector::All),
        Ok(None)
    );
    assert_eq!(
        build_parameters(Some(&Schema::object(Vec::<(&str, Schema)>::new())), &[], ParameterSelector::All),
        Ok(Some(Vec::new()))
    );
}

#[test]
fn test_parameter_contract_violations() {
    assert_eq!(
        build_parameters::<Schema>(None, &[], ParameterSelector::All),
        Err(SchemaContractViolation::NotASchema)
    );
    assert_eq!(
        build_parameters(Some(&Schema::string()), &[], ParameterSelector::All),
        Err(SchemaContractViolation::NotAnObject)
    );
    assert_eq!(
        build_parameters(Some(&Schema::void()), &["id"], ParameterSelector::All),
        Err(SchemaContractViolation::NotAnObject)
    );
    assert_eq!(
        build_parameters(
            Some(&Schema::object([("slug", Schema::string())])),
            &["id"],
            ParameterSelector::All
        ),
        Err(SchemaContractViolation::MissingPathParameter {
            name: "id".to_string()
        })
    );
    assert_eq!(
        build_parameters(
            Some(&Schema::object([("tags", Schema::array(Schema::string()))])),
            &[],
            ParameterSelector::All
        ),
        Err(SchemaContractViolation::NonStringParameter {
            name: "tags".to_string()
        })
    );
    assert_eq!(
        build_parameters(
            Some(&Schema::object([("id", Schema::string().optional())])),
            &["id"],
            ParameterSelector::All
        ),
        Err(SchemaContractViolation::OptionalPathParameter {
            name: "id".to_string()
        })
    );
}

#[test]
fn test_unwraps_effects_and_preprocess_on_input() {
    let schema = Schema::preprocess(
        |v| v,
        Schema::object([("id", Schema::string())]).refine(|_| true, "never"),
    );
    let built = params(&schema, &["id"], ParameterSelector::All);
    assert_eq!(built[0]["in"], "path");
}

#[test]
fn test_coercible_fields_need_coercion_support() {
    let schema = Schema::object([("page", Schema::number())]);
    assert!(build_parameters(Some(&schema), &[], ParameterSelector::All).is_ok());

    let wrapped = NoCoerce(schema);
    assert_eq!(
        build_parameters(Some(&wrapped), &[], ParameterSelector::All),
        Err(SchemaContractViolation::NonStringParameter {
            name: "page".to_string()
        })
    );

    let strings = NoCoerce(Schema::object([("slug", Schema::enumeration(["a", "b"]))]));
    assert!(build_parameters(Some(&strings), &[], ParameterSelector::All).is_ok());
}

#[test]
fn test_request_body() {
    let schema = Schema::object([("title", Schema::string()), ("draft", Schema::boolean().optional())]);
    let body = build_request_body(Some(&schema), &[], &[JSON_CONTENT_TYPE])
        .unwrap()
        .unwrap();
    assert!(body.required);
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "required": true,
            "content": {"application/json": {"schema": {
                "type": "object",
                "properties": {"title": {"type": "string"}, "draft": {"type": "boolean"}},
                "required": ["title"]
            }}}
        })
    );
}

#[test]
fn test_request_body_shares_schema_across_content_types() {
    let schema = Schema::object([("title", Schema::string())]).optional();
    let body = build_request_body(
        Some(&schema),
        &[],
        &[JSON_CONTENT_TYPE, "application/x-www-form-urlencoded"],
    )
    .unwrap()
    .unwrap();
    assert!(!body.required);
    assert_eq!(body.content.len(), 2);
    assert_eq!(
        body.content[JSON_CONTENT_TYPE],
        body.content["application/x-www-form-urlencoded"]
    );
}

#[test]
fn test_request_body_absent_cases() {
    assert_eq!(
        build_request_body(Some(&Schema::void()), &[], &[JSON_CONTENT_TYPE]),
        Ok(None)
    );
    let only_path = Schema::object([("postId", Schema::string())]);
    assert_eq!(
        build_request_body(Some(&only_path), &["postId"], &[JSON_CONTENT_TYPE]),
        Ok(None)
    );
    let mixed = Schema::object([("postId", Schema::string()), ("title", Schema::string())]);
    assert!(build_request_body(Some(&mixed), &["postId"], &[JSON_CONTENT_TYPE])
        .unwrap()
        .is_some());
    assert_eq!(
        build_request_body(Some(&Schema::string()), &[], &[JSON_CONTENT_TYPE]),
        Err(SchemaContractViolation::NotAnObject)
    );
}

#[test]
fn test_responses() {
    let responses = build_responses(Some(&Schema::object([("title", Schema::string())])));
    assert_eq!(
        serde_json::to_value(&responses).unwrap(),
        json!({
            "200": {
                "description": "Successful response",
                "content": {"application/json": {"schema": {
                    "type": "object",
                    "properties": {"title": {"type": "string"}},
                    "required": ["title"]
                }}}
            },
            "500": {"$ref": "#/components/responses/error"}
        })
    );
    let unknown = build_responses::<Schema>(None);
    assert_eq!(
        serde_json::to_value(&unknown["200"]).unwrap()["content"]["application/json"]["schema"],
        json!({})
    );
}

#[test]
fn test_operation_defaults_and_ids() {
    let schemas = ActionSchemas {
        input: Some(Schema::void()),
        ..ActionSchemas::default()
    };
    let op = build_operation(RouteMethod::Get, "/v1.0/health", &[], &schemas).unwrap();
    assert_eq!(op.operation_id, "/v1-0/health");
    assert_eq!(op.summary, "Name Metadata missing");
    assert_eq!(op.description, "Description Metadata missing");
    assert!(op.tags.is_empty());
    assert!(op.parameters.is_none());
    assert!(op.request_body.is_none());
    assert_eq!(
        serde_json::to_value(&op.security).unwrap(),
        json!([{"Authorization": []}])
    );
}

#[test]
fn test_operation_uses_metadata() {
    let schemas = ActionSchemas {
        input: Some(Schema::void()),
        output: None,
        metadata: ActionMetadata::new("listPosts")
            .with_description("List posts")
            .with_tags(["posts"]),
    };
    let op = build_operation(RouteMethod::Get, "/posts", &[], &schemas).unwrap();
    assert_eq!(op.summary, "listPosts");
    assert_eq!(op.description, "List posts");
    assert_eq!(op.tags, vec!["posts".to_string()]);
}

#[test]
fn test_post_and_put_list_only_path_parameters() {
    let schemas = ActionSchemas {
        input: Some(Schema::object([
            ("postId", Schema::string()),
            ("title", Schema::string()),
        ])),
        ..ActionSchemas::default()
    };
    let put = build_operation(RouteMethod::Put, "/posts/{postId}", &["postId"], &schemas).unwrap();
    let params = put.parameters.unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "postId");
    assert_eq!(params[0].location, ParameterLocation::Path);
    assert!(put.request_body.is_some());

    let post = build_operation(RouteMethod::Post, "/posts", &[], &ActionSchemas {
        input: Some(Schema::object([("title", Schema::string())])),
        ..ActionSchemas::default()
    })
    .unwrap();
    assert!(post.parameters.is_none());
    assert!(post.request_body.is_some());
}

#[test]
fn test_error_component() {
    assert_eq!(
        serde_json::to_value(error_response()).unwrap(),
        json!({
            "description": "Error response",
            "content": {"application/json": {"schema": {
                "type": "object",
                "properties": {"message": {"type": "string"}, "code": {"type": "string"}},
                "required": ["message", "code"]
            }}}
        })
    );
}
