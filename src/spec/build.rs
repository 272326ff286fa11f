use super::error::{SchemaContractViolation, SpecError};
use super::types::{
    Components, Info, MediaType, OpenApiDocument, Operation, ParameterLocation, ParameterObject,
    ParameterSelector, PathItem, Paths, RequestBody, ResponseObject, ResponseOrRef, Responses,
    SecurityScheme, Server,
};
use crate::action::ActionSchemas;
use crate::config::ApiInfo;
use crate::router::{RouteMethod, RouteTable};
use crate::schema::{
    is_coercible, is_string_like, is_void_like, object_fields, optional_inner, unwrap,
    IntrospectSchema,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const OPENAPI_VERSION: &str = "3.0.1";
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Name of the single bearer-auth security scheme
pub const SECURITY_SCHEME_NAME: &str = "Authorization";
pub const ERROR_RESPONSE_REF: &str = "#/components/responses/error";

const MISSING_NAME: &str = "Name Metadata missing";
const MISSING_DESCRIPTION: &str = "Description Metadata missing";

fn security_schemes() -> BTreeMap<String, SecurityScheme> {
    BTreeMap::from([(
        SECURITY_SCHEME_NAME.to_string(),
        SecurityScheme {
            kind: "http".to_string(),
            scheme: "bearer".to_string(),
        },
    )])
}

fn json_content(schema: Value) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(JSON_CONTENT_TYPE.to_string(), MediaType { schema })])
}

/// Shared `error` response: `{message: string, code: string}`.
#[must_use]
pub fn error_response() -> ResponseObject {
    ResponseObject {
        description: "Error response".to_string(),
        content: json_content(json!({
            "type": "object",
            "properties": {
                "message": {"type": "string"},
                "code": {"type": "string"}
            },
            "required": ["message", "code"]
        })),
    }
}

/// Unwrapped input schema plus its field list, after the checks shared by
/// parameter and request body generation.
///
/// `Ok(None)` means the input is void-like and there are no path parameters.
fn unwrap_input<S: IntrospectSchema>(
    schema: Option<&S>,
    path_params: &[&str],
) -> Result<Option<(bool, S, Vec<(String, S)>)>, SchemaContractViolation> {
    let schema = schema.ok_or(SchemaContractViolation::NotASchema)?;
    let is_required = !schema.is_optional();
    let unwrapped = unwrap(schema, true);

    if path_params.is_empty() && is_void_like(&unwrapped) {
        return Ok(None);
    }

    let fields = object_fields(&unwrapped).ok_or(SchemaContractViolation::NotAnObject)?;
    if let Some(missing) = path_params
        .iter()
        .find(|p| !fields.iter().any(|(name, _)| name.as_str() == **p))
    {
        return Err(SchemaContractViolation::MissingPathParameter {
            name: (*missing).to_string(),
        });
    }

    Ok(Some((is_required, unwrapped, fields)))
}

/// Build the parameter objects for an input schema.
///
/// Fields are emitted in declaration order and filtered by `selector`. Every
/// emitted field must be string-like (or a coercible scalar when the schema
/// library coerces). Returns `Ok(None)` for a void input with no path
/// parameters, meaning the operation has no parameters at all.
///
/// # Errors
///
/// Returns a [`SchemaContractViolation`] when the schema cannot be described
/// as parameters.
pub fn build_parameters<S: IntrospectSchema>(
    schema: Option<&S>,
    path_params: &[&str],
    selector: ParameterSelector,
) -> Result<Option<Vec<ParameterObject>>, SchemaContractViolation> {
    let Some((is_required, _, fields)) = unwrap_input(schema, path_params)? else {
        return Ok(None);
    };

    let mut parameters = Vec::with_capacity(fields.len());
    for (name, field) in fields {
        let is_path_parameter = path_params.contains(&name.as_str());
        if !selector.keeps(is_path_parameter) {
            continue;
        }

        let is_field_required = !field.is_optional();
        if !is_string_like(&field) && !(S::supports_coercion() && is_coercible(&field)) {
            return Err(SchemaContractViolation::NonStringParameter { name });
        }

        let field = match optional_inner(&field) {
            Some(_) if is_path_parameter => {
                return Err(SchemaContractViolation::OptionalPathParameter { name });
            }
            Some(inner) => inner,
            None => field,
        };

        let mut schema = field.to_structural_schema();
        let description = schema
            .as_object_mut()
            .and_then(|obj| obj.remove("description"))
            .and_then(|d| d.as_str().map(str::to_owned));

        parameters.push(ParameterObject {
            name,
            location: if is_path_parameter {
                ParameterLocation::Path
            } else {
                ParameterLocation::Query
            },
            required: is_path_parameter || (is_required && is_field_required),
            schema,
            description,
        });
    }
    Ok(Some(parameters))
}

/// Build the request body for an input schema, one media type per entry of
/// `content_types`, all sharing the same rendered schema.
///
/// Returns `Ok(None)` for a void input with no path parameters, and when the
/// path parameters account for every field of the input.
///
/// # Errors
///
/// Returns a [`SchemaContractViolation`] when the schema is missing, not an
/// object, or lacks a field for a path placeholder.
pub fn build_request_body<S: IntrospectSchema>(
    schema: Option<&S>,
    path_params: &[&str],
    content_types: &[&str],
) -> Result<Option<RequestBody>, SchemaContractViolation> {
    let Some((is_required, unwrapped, fields)) = unwrap_input(schema, path_params)? else {
        return Ok(None);
    };

    if !path_params.is_empty()
        && fields
            .iter()
            .all(|(name, _)| path_params.contains(&name.as_str()))
    {
        return Ok(None);
    }

    let schema = unwrapped.to_structural_schema();
    let content = content_types
        .iter()
        .map(|ct| (ct.to_string(), MediaType { schema: schema.clone() }))
        .collect();

    Ok(Some(RequestBody {
        required: is_required,
        content,
    }))
}

/// `200` described by the output schema (unconstrained when absent) and a
/// `500` referencing the shared error response.
#[must_use]
pub fn build_responses<S: IntrospectSchema>(output: Option<&S>) -> Responses {
    let schema = output.map_or_else(|| json!({}), S::to_structural_schema);
    BTreeMap::from([
        (
            "200".to_string(),
            ResponseOrRef::Response(ResponseObject {
                description: "Successful response".to_string(),
                content: json_content(schema),
            }),
        ),
        (
            "500".to_string(),
            ResponseOrRef::Ref {
                reference: ERROR_RESPONSE_REF.to_string(),
            },
        ),
    ])
}

/// Build one operation for `method` on `path`.
///
/// GET and DELETE describe their input as parameters. POST and PUT use a
/// JSON request body and list only their path parameters.
///
/// # Errors
///
/// Propagates any [`SchemaContractViolation`] from the input schema.
pub fn build_operation(
    method: RouteMethod,
    path: &str,
    path_params: &[&str],
    schemas: &ActionSchemas,
) -> Result<Operation, SchemaContractViolation> {
    let input = schemas.input.as_ref();
    let (parameters, request_body) = if method.accepts_body() {
        let parameters = if path_params.is_empty() {
            None
        } else {
            build_parameters(input, path_params, ParameterSelector::Path)?
        };
        let body = build_request_body(input, path_params, &[JSON_CONTENT_TYPE])?;
        (parameters, body)
    } else {
        (
            build_parameters(input, path_params, ParameterSelector::All)?,
            None,
        )
    };

    let metadata = &schemas.metadata;
    Ok(Operation {
        operation_id: path.replace('.', "-"),
        summary: metadata
            .name
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MISSING_NAME.to_string()),
        description: metadata
            .description
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
        security: security_schemes()
            .into_keys()
            .map(|name| BTreeMap::from([(name, Vec::new())]))
            .collect(),
        tags: metadata.tags.clone(),
        parameters,
        request_body,
        responses: build_responses(schemas.output.as_ref()),
    })
}

/// Generate the OpenAPI document for every route in `table`.
///
/// Paths appear in registration order and methods in GET, POST, PUT, DELETE
/// order. The document is rebuilt on every call.
///
/// # Errors
///
/// Fails on the first route whose schema violates the contract; no partial
/// document is returned.
pub fn generate_openapi_document(
    table: &RouteTable,
    info: &ApiInfo,
) -> Result<OpenApiDocument, SpecError> {
    let mut paths = Paths::default();
    let mut operations_count = 0usize;

    for entry in table.entries() {
        let path = entry.template().as_str();
        let path_params: Vec<&str> = entry.template().param_names().collect();
        let mut item = PathItem::default();

        for (method, config) in entry.methods() {
            let schemas = config.source.schemas();
            let operation =
                build_operation(method, path, &path_params, &schemas).map_err(|violation| {
                    warn!(
                        method = %method,
                        path = %path,
                        violation = %violation,
                        "Route schema cannot be described"
                    );
                    SpecError {
                        path: path.to_string(),
                        method,
                        violation,
                    }
                })?;
            let slot = match method {
                RouteMethod::Get => &mut item.get,
                RouteMethod::Post => &mut item.post,
                RouteMethod::Put => &mut item.put,
                RouteMethod::Delete => &mut item.delete,
            };
            *slot = Some(operation);
            operations_count += 1;
        }

        paths.push(path.to_string(), item);
    }

    info!(
        paths_count = paths.len(),
        operations_count = operations_count,
        title = %info.title,
        "OpenAPI document generated"
    );

    Ok(OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: info.title.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
        },
        servers: info.urls.iter().map(|url| Server { url: url.clone() }).collect(),
        components: Components {
            security_schemes: security_schemes(),
            responses: BTreeMap::from([("error".to_string(), error_response())]),
        },
        paths,
    })
}
