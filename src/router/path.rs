//! Path templates with `{name}` placeholders.
//!
//! Matching is purely structural: both sides are split on `/`, the segment
//! counts must agree, literal segments compare exactly (case-sensitive) and
//! placeholders capture the raw request segment without decoding.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum number of path/query parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` because they come from the compiled template
/// and are shared by every match; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^{}/]+)\}$").expect("placeholder pattern is valid"));

/// Reason a route template was rejected at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The same placeholder name appears twice in one template
    DuplicateParameter { template: String, name: String },
    /// A segment contains braces but is not a single `{name}` placeholder
    MalformedSegment { template: String, segment: String },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::DuplicateParameter { template, name } => {
                write!(f, "duplicate path parameter '{name}' in route template '{template}'")
            }
            TemplateError::MalformedSegment { template, segment } => {
                write!(f, "malformed segment '{segment}' in route template '{template}'")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

/// A compiled route template such as `/posts/{postId}/comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template, validating placeholder syntax.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for a segment with stray braces (including
    /// an empty `{}`) or a placeholder name used twice.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::with_capacity(template.matches('/').count() + 1);
        let mut names: Vec<Arc<str>> = Vec::new();

        for segment in template.split('/') {
            if let Some(caps) = PLACEHOLDER.captures(segment) {
                let name: Arc<str> = Arc::from(&caps[1]);
                if names.contains(&name) {
                    return Err(TemplateError::DuplicateParameter {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name.clone());
                segments.push(Segment::Param(name));
            } else if segment.contains(['{', '}']) {
                return Err(TemplateError::MalformedSegment {
                    template: template.to_string(),
                    segment: segment.to_string(),
                });
            } else {
                segments.push(Segment::Literal(segment.to_string()));
            }
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template text as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete request path.
    ///
    /// Returns `None` when the path does not fit the template, otherwise the
    /// captured placeholder values (empty for a template with no
    /// placeholders, which is still a match).
    ///
    /// # Example
    ///
    /// ```
    /// use action_router::router::PathTemplate;
    ///
    /// let t = PathTemplate::compile("/posts/{postId}").unwrap();
    /// let params = t.match_path("/posts/42").unwrap();
    /// assert_eq!(params[0].1, "42");
    /// assert!(t.match_path("/posts/42/comments").is_none());
    /// ```
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamVec> {
        if path.split('/').count() != self.segments.len() {
            return None;
        }

        let mut params = ParamVec::new();
        for (segment, part) in self.segments.iter().zip(path.split('/')) {
            match segment {
                Segment::Param(name) => params.push((Arc::clone(name), part.to_string())),
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
