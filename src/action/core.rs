use super::source::{ActionHandler, ActionMetadata, ActionSchemas, SchemaSource};
use crate::schema::{is_void_like, unwrap, Schema};
use crate::validator::{build_validation_errors, ErrorTree};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Message returned to callers when a server error is masked.
pub const DEFAULT_SERVER_ERROR: &str = "Something went wrong while executing the operation";

/// Builds the action context from the parsed input.
pub type MiddlewareFn<C> = Arc<dyn Fn(&Value) -> anyhow::Result<C> + Send + Sync>;
/// Receives every error raised by middleware or server code.
pub type ServerErrorLogFn = Arc<dyn Fn(&anyhow::Error) + Send + Sync>;
/// Turns a server-side error into what the caller gets to see.
pub type ReturnedServerErrorFn = Arc<dyn Fn(&anyhow::Error) -> ServerError + Send + Sync>;
/// User code run with the parsed input and the middleware context.
pub type ServerCodeFn<C> = Arc<dyn Fn(Value, C) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// Caller-visible description of a failed action.
///
/// Server code can return one directly (wrapped in `anyhow::Error`) to pick
/// the message and HTTP status; anything else is masked by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// HTTP status used when the result is served over HTTP
    #[serde(skip)]
    pub status: Option<u16>,
}

impl ServerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ServerError {}

/// Outcome of one action call; serializes as exactly one of
/// `{"data": ...}`, `{"validationErrors": ...}` or `{"serverError": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActionResult {
    #[serde(rename = "data")]
    Data(Value),
    #[serde(rename = "validationErrors")]
    ValidationErrors(ErrorTree),
    #[serde(rename = "serverError")]
    ServerError(ServerError),
}

impl ActionResult {
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            ActionResult::Data(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<Value> {
        match self {
            ActionResult::Data(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn validation_errors(&self) -> Option<&ErrorTree> {
        match self {
            ActionResult::ValidationErrors(tree) => Some(tree),
            _ => None,
        }
    }

    #[must_use]
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            ActionResult::ServerError(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn default_server_error_log(e: &anyhow::Error) {
    error!(error = %e, "Action error");
}

fn default_returned_server_error(e: &anyhow::Error) -> ServerError {
    match e.downcast_ref::<ServerError>() {
        Some(public) => public.clone(),
        None => ServerError::new(DEFAULT_SERVER_ERROR),
    }
}

/// Factory for actions sharing the same middleware and error handling.
///
/// `C` is the context type produced by the middleware; a client without
/// middleware uses `()`.
pub struct ActionClient<C = ()> {
    middleware: MiddlewareFn<C>,
    handle_server_error_log: ServerErrorLogFn,
    handle_returned_server_error: ReturnedServerErrorFn,
    validate_output: bool,
}

impl<C> Clone for ActionClient<C> {
    fn clone(&self) -> Self {
        Self {
            middleware: Arc::clone(&self.middleware),
            handle_server_error_log: Arc::clone(&self.handle_server_error_log),
            handle_returned_server_error: Arc::clone(&self.handle_returned_server_error),
            validate_output: self.validate_output,
        }
    }
}

impl Default for ActionClient<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionClient<()> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            middleware: Arc::new(|_| Ok(())),
            handle_server_error_log: Arc::new(default_server_error_log),
            handle_returned_server_error: Arc::new(default_returned_server_error),
            validate_output: false,
        }
    }
}

impl<C: 'static> ActionClient<C> {
    /// Replace the middleware, changing the context type handed to server code.
    ///
    /// Middleware runs after input validation; an error aborts the call as a
    /// server error.
    pub fn with_middleware<D>(
        self,
        middleware: impl Fn(&Value) -> anyhow::Result<D> + Send + Sync + 'static,
    ) -> ActionClient<D> {
        ActionClient {
            middleware: Arc::new(middleware),
            handle_server_error_log: self.handle_server_error_log,
            handle_returned_server_error: self.handle_returned_server_error,
            validate_output: self.validate_output,
        }
    }

    #[must_use]
    pub fn on_server_error_log(
        mut self,
        log: impl Fn(&anyhow::Error) + Send + Sync + 'static,
    ) -> Self {
        self.handle_server_error_log = Arc::new(log);
        self
    }

    #[must_use]
    pub fn on_returned_server_error(
        mut self,
        map: impl Fn(&anyhow::Error) -> ServerError + Send + Sync + 'static,
    ) -> Self {
        self.handle_returned_server_error = Arc::new(map);
        self
    }

    /// Check handler data against the output schema and log mismatches.
    #[must_use]
    pub fn validate_output(mut self, enabled: bool) -> Self {
        self.validate_output = enabled;
        self
    }

    /// Build an action from its input schema and server code.
    ///
    /// Server code returning `Ok(None)` produces `data: null`.
    pub fn action<F>(&self, input: Schema, server_code: F) -> Action<C>
    where
        F: Fn(Value, C) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Action {
            client: self.clone(),
            input,
            output: None,
            output_validator: OnceCell::new(),
            metadata: ActionMetadata::default(),
            server_code: Arc::new(server_code),
        }
    }
}

/// A validated remote procedure: input schema, optional output schema,
/// metadata and server code.
pub struct Action<C> {
    client: ActionClient<C>,
    input: Schema,
    output: Option<Schema>,
    output_validator: OnceCell<Option<jsonschema::Validator>>,
    metadata: ActionMetadata,
    server_code: ServerCodeFn<C>,
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<C: 'static> Action<C> {
    #[must_use]
    pub fn output(mut self, schema: Schema) -> Self {
        self.output = Some(schema);
        self.output_validator = OnceCell::new();
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: ActionMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn input_schema(&self) -> &Schema {
        &self.input
    }

    fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Validate `input`, run middleware and server code, and shape the outcome.
    ///
    /// Validation failures and server errors are returned as data, never as `Err`.
    pub fn execute(&self, input: Option<Value>) -> ActionResult {
        // HTTP dispatch always sends an object; for a void input that means "nothing".
        let input = match input {
            Some(Value::Object(map)) if map.is_empty() && is_void_like(&unwrap(&self.input, true)) => {
                None
            }
            other => other,
        };

        let parsed = match self.input.safe_parse_optional(input.as_ref()) {
            Ok(parsed) => parsed.unwrap_or(Value::Null),
            Err(issues) => {
                debug!(
                    action = %self.name(),
                    issues_count = issues.len(),
                    "Action input validation failed"
                );
                return ActionResult::ValidationErrors(build_validation_errors(&issues));
            }
        };

        let outcome = (self.client.middleware)(&parsed)
            .and_then(|ctx| (self.server_code)(parsed, ctx));

        match outcome {
            Ok(data) => {
                let data = data.unwrap_or(Value::Null);
                if self.client.validate_output {
                    self.check_output(&data);
                }
                ActionResult::Data(data)
            }
            Err(e) => {
                (self.client.handle_server_error_log)(&e);
                ActionResult::ServerError((self.client.handle_returned_server_error)(&e))
            }
        }
    }

    fn check_output(&self, data: &Value) {
        let Some(output) = &self.output else {
            return;
        };
        let validator = self.output_validator.get_or_init(|| {
            match jsonschema::validator_for(&output.to_json_schema()) {
                Ok(validator) => Some(validator),
                Err(e) => {
                    warn!(action = %self.name(), error = %e, "Output schema could not be compiled");
                    None
                }
            }
        });
        let Some(validator) = validator else {
            return;
        };
        let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();
        if !errors.is_empty() {
            warn!(
                action = %self.name(),
                errors = ?errors,
                "Action output does not match its output schema"
            );
        }
    }
}

impl<C: 'static> ActionHandler for Action<C> {
    fn call(&self, input: Option<Value>) -> ActionResult {
        self.execute(input)
    }
}

impl<C: 'static> SchemaSource for Action<C> {
    fn schemas(&self) -> ActionSchemas {
        ActionSchemas {
            input: Some(self.input.clone()),
            output: self.output.clone(),
            metadata: self.metadata.clone(),
        }
    }
}
