//! # Spec Module
//!
//! Generates an OpenAPI 3.0 document from a [`RouteTable`](crate::router::RouteTable)
//! by introspecting each route's input and output schemas. Nothing is written
//! by hand: parameters, request bodies and responses all come from the schemas
//! already attached to the actions.
//!
//! The builders are generic over
//! [`IntrospectSchema`](crate::schema::IntrospectSchema), so they work with any
//! schema library that implements the capability interface.

mod build;
mod error;
#[cfg(test)]
mod tests;
mod types;

pub use build::{
    build_operation, build_parameters, build_request_body, build_responses, error_response,
    generate_openapi_document, ERROR_RESPONSE_REF, JSON_CONTENT_TYPE, OPENAPI_VERSION,
    SECURITY_SCHEME_NAME,
};
pub use error::{SchemaContractViolation, SpecError};
pub use types::{
    Components, Info, MediaType, OpenApiDocument, Operation, ParameterLocation, ParameterObject,
    ParameterSelector, PathItem, Paths, RequestBody, ResponseObject, ResponseOrRef, Responses,
    SecurityScheme, Server,
};
