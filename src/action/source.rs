use super::core::ActionResult;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Human-facing description of an action, surfaced in the generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ActionMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Schemas and metadata exposed by a registered route.
///
/// A source with no input schema cannot be described as parameters or a
/// request body; document generation rejects it.
#[derive(Debug, Clone, Default)]
pub struct ActionSchemas {
    pub input: Option<Schema>,
    pub output: Option<Schema>,
    pub metadata: ActionMetadata,
}

/// Anything that can describe the input/output contract of a route.
pub trait SchemaSource: Send + Sync {
    fn schemas(&self) -> ActionSchemas;
}

/// Invocation side of a route: takes the merged raw input and produces a result.
pub trait ActionHandler: Send + Sync {
    fn call(&self, input: Option<Value>) -> ActionResult;
}
