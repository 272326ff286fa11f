//! Tests for actions used through the public client API

use action_router::action::{
    ActionClient, ActionHandler, ActionMetadata, ActionResult, SchemaSource, ServerError,
};
use action_router::schema::Schema;
use anyhow::bail;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Session {
    user: String,
}

fn authed_client() -> ActionClient<Session> {
    ActionClient::new().with_middleware(|input: &Value| {
        match input.get("token").and_then(Value::as_str) {
            Some("secret") => Ok(Session {
                user: "ada".to_string(),
            }),
            _ => Err(ServerError::new("Unauthorized").with_status(401).into()),
        }
    })
}

#[test]
fn test_middleware_context_reaches_server_code() {
    let whoami = authed_client().action(
        Schema::object([("token", Schema::string())]),
        |_, session: Session| Ok(Some(json!({ "user": session.user }))),
    );
    assert_eq!(
        whoami.execute(Some(json!({"token": "secret"}))).to_json(),
        json!({"data": {"user": "ada"}})
    );
    assert_eq!(
        whoami.execute(Some(json!({"token": "guess"}))).to_json(),
        json!({"serverError": {"message": "Unauthorized"}})
    );
}

#[test]
fn test_middleware_not_run_on_invalid_input() {
    let whoami = authed_client().action(
        Schema::object([("token", Schema::string())]),
        |_, _| Ok(None),
    );
    let result = whoami.execute(Some(json!({})));
    assert_eq!(
        result.to_json(),
        json!({"validationErrors": {"token": {"_errors": ["Required"]}}})
    );
}

#[test]
fn test_custom_error_mapping() {
    let client = ActionClient::new()
        .on_server_error_log(|_| {})
        .on_returned_server_error(|e| ServerError::new(e.to_string()).with_code("INTERNAL"));
    let action = client.action(Schema::void(), |_, _| bail!("disk full"));
    assert_eq!(
        action.execute(None),
        ActionResult::ServerError(ServerError::new("disk full").with_code("INTERNAL"))
    );
}

#[test]
fn test_output_validation_only_logs() {
    let action = ActionClient::new()
        .validate_output(true)
        .action(Schema::void(), |_, _| Ok(Some(json!({"title": 1}))))
        .output(Schema::object([("title", Schema::string())]));
    assert_eq!(action.execute(None).into_data(), Some(json!({"title": 1})));
}

#[test]
fn test_action_exposes_schemas_and_handles_calls() {
    let action = ActionClient::new()
        .action(Schema::object([("n", Schema::integer())]), |input, _| {
            Ok(Some(json!(input["n"].as_i64().unwrap_or_default() * 2)))
        })
        .output(Schema::integer())
        .metadata(ActionMetadata::new("double").with_tags(["math"]));

    let schemas = action.schemas();
    assert!(schemas.input.is_some());
    assert!(schemas.output.is_some());
    assert_eq!(schemas.metadata.name.as_deref(), Some("double"));
    assert_eq!(schemas.metadata.tags, vec!["math".to_string()]);

    assert_eq!(action.call(Some(json!({"n": 21}))).into_data(), Some(json!(42)));
}

#[test]
fn test_cyclic_input_schema_is_a_validation_error() {
    fn cyclic() -> Schema {
        Schema::lazy(cyclic)
    }
    let action = ActionClient::new().action(cyclic(), |_, _| Ok(Some(json!("unreachable"))));
    assert_eq!(
        action.execute(Some(json!({"a": 1}))).to_json(),
        json!({"validationErrors": {"_errors": ["Invalid input"]}})
    );
}
