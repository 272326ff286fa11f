use crate::router::RouteMethod;
use std::fmt;

/// A route's schema does not satisfy what document generation requires.
///
/// These are authoring errors in the route table; generation stops at the
/// first one instead of producing a partial document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaContractViolation {
    /// The route's source exposes no input schema
    NotASchema,
    /// The unwrapped input schema is not an object
    NotAnObject,
    /// A path placeholder has no matching input field
    MissingPathParameter { name: String },
    /// A parameter field is neither string-like nor a coercible scalar
    NonStringParameter { name: String },
    /// A path parameter field is optional
    OptionalPathParameter { name: String },
}

impl fmt::Display for SchemaContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaContractViolation::NotASchema => write!(f, "input parser expects a schema"),
            SchemaContractViolation::NotAnObject => write!(f, "input parser must be an object schema"),
            SchemaContractViolation::MissingPathParameter { name } => {
                write!(f, "input parser expects key from path: \"{name}\"")
            }
            SchemaContractViolation::NonStringParameter { name } => write!(
                f,
                "input parser key \"{name}\" must be string-like or a coercible scalar"
            ),
            SchemaContractViolation::OptionalPathParameter { name } => {
                write!(f, "path parameter \"{name}\" must not be optional")
            }
        }
    }
}

impl std::error::Error for SchemaContractViolation {}

/// Document generation failure, locating the offending operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecError {
    pub path: String,
    pub method: RouteMethod,
    pub violation: SchemaContractViolation,
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.method, self.path, self.violation)
    }
}

impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.violation)
    }
}
