//! Tests for OpenAPI document generation from a route table
//!
//! # Test Coverage
//!
//! - The `/posts/{postId}` scenario: path parameter and 200/500 responses
//! - Document-level fields: version, info, servers, components
//! - Method ordering and operation shape for GET/POST/PUT/DELETE
//! - Contract violations failing the whole document
//! - YAML and JSON renderings of the demo routes

use action_router::action::{ActionClient, ActionMetadata};
use action_router::config::ApiInfo;
use action_router::demo::{demo_routes, PostStore};
use action_router::router::{RouteMethod, RouteTable};
use action_router::schema::Schema;
use action_router::spec::{generate_openapi_document, SchemaContractViolation};
use serde_json::{json, Value};
use std::sync::Arc;

fn posts_table() -> RouteTable {
    let client = ActionClient::new();
    let get_post = client
        .action(Schema::object([("postId", Schema::string())]), |input, _| {
            Ok(Some(json!({ "title": input["postId"] })))
        })
        .output(Schema::object([("title", Schema::string())]));
    let mut routes = RouteTable::new();
    routes.get_action("/posts/{postId}", Arc::new(get_post)).unwrap();
    routes
}

fn document(routes: &RouteTable) -> Value {
    generate_openapi_document(routes, &ApiInfo::default())
        .unwrap()
        .to_json_value()
}

#[test]
fn test_posts_scenario() {
    let doc = document(&posts_table());
    let get = &doc["paths"]["/posts/{postId}"]["get"];

    assert_eq!(
        get["parameters"],
        json!([{"name": "postId", "in": "path", "required": true, "schema": {"type": "string"}}])
    );
    assert!(get["parameters"][0].get("description").is_none());
    assert_eq!(
        get["responses"]["200"]["content"]["application/json"]["schema"],
        json!({"type": "object", "properties": {"title": {"type": "string"}}, "required": ["title"]})
    );
    assert_eq!(
        get["responses"]["500"],
        json!({"$ref": "#/components/responses/error"})
    );
    assert!(get.get("requestBody").is_none());
}

#[test]
fn test_document_envelope() {
    let info = ApiInfo::new("Blog", "2.1.0")
        .with_description("Posts")
        .with_url("https://blog.example.com")
        .with_url("https://staging.blog.example.com");
    let doc = generate_openapi_document(&posts_table(), &info)
        .unwrap()
        .to_json_value();

    assert_eq!(doc["openapi"], "3.0.1");
    assert_eq!(
        doc["info"],
        json!({"title": "Blog", "version": "2.1.0", "description": "Posts"})
    );
    assert_eq!(
        doc["servers"],
        json!([{"url": "https://blog.example.com"}, {"url": "https://staging.blog.example.com"}])
    );
    assert_eq!(
        doc["components"]["securitySchemes"],
        json!({"Authorization": {"type": "http", "scheme": "bearer"}})
    );
    assert_eq!(
        doc["components"]["responses"]["error"]["content"]["application/json"]["schema"]["required"],
        json!(["message", "code"])
    );
}

#[test]
fn test_operation_fields() {
    let doc = document(&posts_table());
    let get = &doc["paths"]["/posts/{postId}"]["get"];
    assert_eq!(get["operationId"], "/posts/{postId}");
    assert_eq!(get["summary"], "Name Metadata missing");
    assert_eq!(get["description"], "Description Metadata missing");
    assert_eq!(get["tags"], json!([]));
    assert_eq!(get["security"], json!([{"Authorization": []}]));
}

#[test]
fn test_demo_document() {
    let routes = demo_routes("/api", Arc::new(PostStore::seeded())).unwrap();
    let doc = document(&routes);

    let paths: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths.len(), 3);

    let list = &doc["paths"]["/api/posts"]["get"];
    assert_eq!(list["summary"], "listPosts");
    assert_eq!(list["tags"], json!(["posts"]));
    assert_eq!(
        list["parameters"],
        json!([
            {"name": "q", "in": "query", "required": false, "schema": {"type": "string"}, "description": "Case-insensitive text search"},
            {"name": "limit", "in": "query", "required": false, "schema": {"type": "integer"}}
        ])
    );

    let create = &doc["paths"]["/api/posts"]["post"];
    assert!(create.get("parameters").is_none());
    assert_eq!(create["requestBody"]["required"], json!(true));
    assert_eq!(
        create["requestBody"]["content"]["application/json"]["schema"]["required"],
        json!(["title", "body"])
    );

    let item = &doc["paths"]["/api/posts/{postId}"];
    let methods: Vec<&String> = item.as_object().unwrap().keys().collect();
    assert_eq!(methods.len(), 3);
    assert_eq!(item["put"]["parameters"][0]["name"], "postId");
    assert_eq!(item["put"]["parameters"].as_array().map(Vec::len), Some(1));
    assert!(item["put"]["requestBody"].is_object());
    assert_eq!(item["delete"]["parameters"][0]["in"], "path");
    assert!(item["delete"].get("requestBody").is_none());

    let health = &doc["paths"]["/api/health"]["get"];
    assert!(health.get("parameters").is_none());
}

#[test]
fn test_paths_serialize_in_registration_order() {
    let routes = demo_routes("", Arc::new(PostStore::new())).unwrap();
    let json = generate_openapi_document(&routes, &ApiInfo::default())
        .unwrap()
        .to_json_pretty()
        .unwrap();
    let health = json.find("\"/health\"").unwrap();
    let posts = json.find("\"/posts\"").unwrap();
    let post = json.find("\"/posts/{postId}\"").unwrap();
    assert!(health < posts && posts < post);
}

#[test]
fn test_yaml_rendering() {
    let routes = demo_routes("", Arc::new(PostStore::new())).unwrap();
    let yaml = generate_openapi_document(&routes, &ApiInfo::default())
        .unwrap()
        .to_yaml()
        .unwrap();
    let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed["openapi"], "3.0.1");
    assert!(parsed["paths"]["/posts/{postId}"]["delete"].is_object());
}

#[test]
fn test_contract_violation_fails_whole_document() {
    let client = ActionClient::new();
    let ok = client.action(Schema::void(), |_, _| Ok(None));
    let bad = client
        .action(
            Schema::object([("postId", Schema::string().optional())]),
            |_, _| Ok(None),
        )
        .metadata(ActionMetadata::new("broken"));

    let mut routes = RouteTable::new();
    routes
        .get_action("/health", Arc::new(ok))
        .unwrap()
        .delete_action("/posts/{postId}", Arc::new(bad))
        .unwrap();

    let err = generate_openapi_document(&routes, &ApiInfo::default()).unwrap_err();
    assert_eq!(err.path, "/posts/{postId}");
    assert_eq!(err.method, RouteMethod::Delete);
    assert_eq!(
        err.violation,
        SchemaContractViolation::OptionalPathParameter {
            name: "postId".to_string()
        }
    );
}

#[test]
fn test_missing_path_parameter_field() {
    let client = ActionClient::new();
    let action = client.action(Schema::object([("id", Schema::string())]), |_, _| Ok(None));
    let mut routes = RouteTable::new();
    routes
        .get_action("/posts/{postId}", Arc::new(action))
        .unwrap();
    let err = generate_openapi_document(&routes, &ApiInfo::default()).unwrap_err();
    assert_eq!(
        err.violation,
        SchemaContractViolation::MissingPathParameter {
            name: "postId".to_string()
        }
    );
}
