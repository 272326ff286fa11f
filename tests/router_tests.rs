//! Tests for path templates and route lookup
//!
//! # Test Coverage
//!
//! - Placeholder binding and segment-count mismatches
//! - First-match-wins lookup in registration order
//! - Re-registration replacing a single method slot
//! - Path prefixes applied at registration

use action_router::action::{ActionHandler, ActionResult, ActionSchemas, SchemaSource};
use action_router::router::{PathTemplate, RouteMethod, RouteTable, TemplateError};
use action_router::schema::Schema;
use serde_json::{json, Value};
use std::sync::Arc;

struct Tagged(&'static str);

impl ActionHandler for Tagged {
    fn call(&self, _input: Option<Value>) -> ActionResult {
        ActionResult::Data(json!(self.0))
    }
}

impl SchemaSource for Tagged {
    fn schemas(&self) -> ActionSchemas {
        ActionSchemas {
            input: Some(Schema::void()),
            ..ActionSchemas::default()
        }
    }
}

fn register(routes: &mut RouteTable, method: RouteMethod, path: &str, tag: &'static str) {
    let handler = Arc::new(Tagged(tag));
    routes
        .register(method, path, Arc::clone(&handler) as Arc<dyn ActionHandler>, handler)
        .unwrap();
}

fn handled_by(routes: &RouteTable, method: RouteMethod, path: &str) -> Option<Value> {
    routes
        .route(method, path)
        .and_then(|m| m.config.handler.call(None).into_data())
}

fn zoo() -> RouteTable {
    let mut routes = RouteTable::new();
    register(&mut routes, RouteMethod::Get, "/", "root");
    register(&mut routes, RouteMethod::Get, "/zoo/animals", "list");
    register(&mut routes, RouteMethod::Post, "/zoo/animals", "create");
    register(&mut routes, RouteMethod::Get, "/zoo/animals/{id}", "get");
    register(&mut routes, RouteMethod::Put, "/zoo/animals/{id}", "update");
    register(&mut routes, RouteMethod::Delete, "/zoo/animals/{id}", "delete");
    register(&mut routes, RouteMethod::Get, "/zoo/animals/{id}/toys/{toy_id}", "toy");
    routes
}

#[test]
fn test_posts_scenario() {
    let single = PathTemplate::compile("/posts/{postId}").unwrap();
    let params = single.match_path("/posts/42").unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0.as_ref(), "postId");
    assert_eq!(params[0].1, "42");

    let nested = PathTemplate::compile("/posts/{postId}/comments").unwrap();
    assert!(nested.match_path("/posts/42").is_none());
}

#[test]
fn test_zoo_routing() {
    let routes = zoo();
    let cases = [
        (RouteMethod::Get, "/", Some("root")),
        (RouteMethod::Get, "/zoo/animals", Some("list")),
        (RouteMethod::Post, "/zoo/animals", Some("create")),
        (RouteMethod::Get, "/zoo/animals/7", Some("get")),
        (RouteMethod::Put, "/zoo/animals/7", Some("update")),
        (RouteMethod::Delete, "/zoo/animals/7", Some("delete")),
        (RouteMethod::Get, "/zoo/animals/7/toys/ball", Some("toy")),
        (RouteMethod::Delete, "/zoo/animals", None),
        (RouteMethod::Get, "/Zoo/animals", None),
        (RouteMethod::Get, "/zoo/animals/7/toys", None),
        (RouteMethod::Get, "/does/not/exist", None),
    ];
    for (method, path, expected) in cases {
        assert_eq!(
            handled_by(&routes, method, path),
            expected.map(|tag| json!(tag)),
            "{method} {path}"
        );
    }
}

#[test]
fn test_route_match_carries_params() {
    let routes = zoo();
    let matched = routes
        .route(RouteMethod::Get, "/zoo/animals/7/toys/ball%20red")
        .unwrap();
    assert_eq!(matched.template, "/zoo/animals/{id}/toys/{toy_id}");
    assert_eq!(matched.get_path_param("id"), Some("7"));
    assert_eq!(matched.get_path_param("toy_id"), Some("ball%20red"));
    assert_eq!(matched.method, RouteMethod::Get);
}

#[test]
fn test_first_registered_match_wins() {
    let mut routes = RouteTable::new();
    register(&mut routes, RouteMethod::Get, "/files/{name}", "param");
    register(&mut routes, RouteMethod::Get, "/files/latest", "literal");
    assert_eq!(
        handled_by(&routes, RouteMethod::Get, "/files/latest"),
        Some(json!("param"))
    );
}

#[test]
fn test_search_skips_paths_without_method() {
    let mut routes = RouteTable::new();
    register(&mut routes, RouteMethod::Get, "/files/{name}", "get");
    register(&mut routes, RouteMethod::Delete, "/files/latest", "delete");
    assert_eq!(
        handled_by(&routes, RouteMethod::Delete, "/files/latest"),
        Some(json!("delete"))
    );
}

#[test]
fn test_reregistration_keeps_siblings_and_order() {
    let mut routes = zoo();
    assert_eq!((routes.path_count(), routes.len()), (4, 7));
    register(&mut routes, RouteMethod::Get, "/zoo/animals", "list-v2");
    assert_eq!((routes.path_count(), routes.len()), (4, 7));
    assert_eq!(routes.entries()[1].template().as_str(), "/zoo/animals");
    assert_eq!(
        handled_by(&routes, RouteMethod::Get, "/zoo/animals"),
        Some(json!("list-v2"))
    );
    assert_eq!(
        handled_by(&routes, RouteMethod::Post, "/zoo/animals"),
        Some(json!("create"))
    );
}

#[test]
fn test_prefixed_table() {
    let mut routes = RouteTable::with_prefix("/api");
    register(&mut routes, RouteMethod::Get, "/posts/{postId}", "get");
    assert_eq!(routes.entries()[0].template().as_str(), "/api/posts/{postId}");
    assert!(routes.route(RouteMethod::Get, "/posts/1").is_none());
    assert_eq!(
        handled_by(&routes, RouteMethod::Get, "/api/posts/1"),
        Some(json!("get"))
    );
}

#[test]
fn test_invalid_templates_are_rejected() {
    let mut routes = RouteTable::new();
    let handler = Arc::new(Tagged("x"));
    let err = routes
        .register(
            RouteMethod::Get,
            "/a/{id}/b/{id}",
            Arc::clone(&handler) as Arc<dyn ActionHandler>,
            handler,
        )
        .unwrap_err();
    assert!(matches!(err, TemplateError::DuplicateParameter { ref name, .. } if name == "id"));
    assert!(routes.is_empty());
}
