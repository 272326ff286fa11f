use super::path::{ParamVec, PathTemplate, TemplateError};
use crate::action::{Action, ActionHandler, SchemaSource};
use http::Method;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// HTTP methods an action can be exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RouteMethod {
    /// All methods, in the order operations are emitted per path.
    pub const ALL: [RouteMethod; 4] = [
        RouteMethod::Get,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Delete,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
        }
    }

    /// Key used for the method under a path item.
    #[must_use]
    pub fn lowercase(self) -> &'static str {
        match self {
            RouteMethod::Get => "get",
            RouteMethod::Post => "post",
            RouteMethod::Put => "put",
            RouteMethod::Delete => "delete",
        }
    }

    /// Map an HTTP method; anything other than GET/POST/PUT/DELETE is unsupported.
    #[must_use]
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(RouteMethod::Get),
            Method::POST => Some(RouteMethod::Post),
            Method::PUT => Some(RouteMethod::Put),
            Method::DELETE => Some(RouteMethod::Delete),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_http(self) -> Method {
        match self {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Delete => Method::DELETE,
        }
    }

    /// POST and PUT carry their input in a JSON body.
    #[must_use]
    pub fn accepts_body(self) -> bool {
        matches!(self, RouteMethod::Post | RouteMethod::Put)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(RouteMethod::Get),
            "POST" => Ok(RouteMethod::Post),
            "PUT" => Ok(RouteMethod::Put),
            "DELETE" => Ok(RouteMethod::Delete),
            other => Err(format!("unsupported method '{other}'")),
        }
    }
}

/// Handler and schema source registered for one path + method.
#[derive(Clone)]
pub struct RouteConfig {
    pub handler: Arc<dyn ActionHandler>,
    pub source: Arc<dyn SchemaSource>,
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.source.schemas().metadata.name;
        f.debug_struct("RouteConfig").field("name", &name).finish()
    }
}

/// One registered path with its per-method slots.
#[derive(Debug, Clone)]
pub struct PathRoutes {
    template: PathTemplate,
    methods: [Option<RouteConfig>; 4],
}

impl PathRoutes {
    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    #[must_use]
    pub fn method(&self, method: RouteMethod) -> Option<&RouteConfig> {
        self.methods[method.slot()].as_ref()
    }

    /// Registered methods in GET, POST, PUT, DELETE order.
    pub fn methods(&self) -> impl Iterator<Item = (RouteMethod, &RouteConfig)> + '_ {
        RouteMethod::ALL
            .into_iter()
            .filter_map(|m| self.method(m).map(|config| (m, config)))
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub method: RouteMethod,
    /// Full template of the matched route, prefix included
    pub template: String,
    pub config: RouteConfig,
    /// Path parameters extracted from the URL (e.g., `{postId}` → `"42"`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Registry of actions keyed by path and method.
///
/// Paths keep their first-registration order; registering the same path and
/// method again replaces only that slot. The table is filled once at startup
/// and then shared read-only (typically as `Arc<RouteTable>`) by the
/// dispatcher and the document generator.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<PathRoutes>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose registered paths are all prefixed with `prefix` (e.g. `/api`).
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register `handler`/`source` under `prefix + path` for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the full path is not a valid template.
    pub fn register(
        &mut self,
        method: RouteMethod,
        path: &str,
        handler: Arc<dyn ActionHandler>,
        source: Arc<dyn SchemaSource>,
    ) -> Result<&mut Self, TemplateError> {
        let full_path = format!("{}{}", self.prefix, path);
        let config = RouteConfig { handler, source };

        let index = match self
            .routes
            .iter()
            .position(|r| r.template.as_str() == full_path)
        {
            Some(index) => index,
            None => {
                let template = PathTemplate::compile(&full_path)?;
                self.routes.push(PathRoutes {
                    template,
                    methods: Default::default(),
                });
                self.routes.len() - 1
            }
        };

        let slot = &mut self.routes[index].methods[method.slot()];
        if slot.is_some() {
            debug!(method = %method, path = %full_path, "Replacing registered route");
        }
        *slot = Some(config);
        Ok(self)
    }

    pub fn get(
        &mut self,
        path: &str,
        handler: Arc<dyn ActionHandler>,
        source: Arc<dyn SchemaSource>,
    ) -> Result<&mut Self, TemplateError> {
        self.register(RouteMethod::Get, path, handler, source)
    }

    pub fn post(
        &mut self,
        path: &str,
        handler: Arc<dyn ActionHandler>,
        source: Arc<dyn SchemaSource>,
    ) -> Result<&mut Self, TemplateError> {
        self.register(RouteMethod::Post, path, handler, source)
    }

    pub fn put(
        &mut self,
        path: &str,
        handler: Arc<dyn ActionHandler>,
        source: Arc<dyn SchemaSource>,
    ) -> Result<&mut Self, TemplateError> {
        self.register(RouteMethod::Put, path, handler, source)
    }

    pub fn delete(
        &mut self,
        path: &str,
        handler: Arc<dyn ActionHandler>,
        source: Arc<dyn SchemaSource>,
    ) -> Result<&mut Self, TemplateError> {
        self.register(RouteMethod::Delete, path, handler, source)
    }

    /// Register an action as both handler and schema source.
    pub fn action<C: 'static>(
        &mut self,
        method: RouteMethod,
        path: &str,
        action: Arc<Action<C>>,
    ) -> Result<&mut Self, TemplateError> {
        let source: Arc<dyn SchemaSource> = action.clone();
        self.register(method, path, action, source)
    }

    pub fn get_action<C: 'static>(
        &mut self,
        path: &str,
        action: Arc<Action<C>>,
    ) -> Result<&mut Self, TemplateError> {
        self.action(RouteMethod::Get, path, action)
    }

    pub fn post_action<C: 'static>(
        &mut self,
        path: &str,
        action: Arc<Action<C>>,
    ) -> Result<&mut Self, TemplateError> {
        self.action(RouteMethod::Post, path, action)
    }

    pub fn put_action<C: 'static>(
        &mut self,
        path: &str,
        action: Arc<Action<C>>,
    ) -> Result<&mut Self, TemplateError> {
        self.action(RouteMethod::Put, path, action)
    }

    pub fn delete_action<C: 'static>(
        &mut self,
        path: &str,
        action: Arc<Action<C>>,
    ) -> Result<&mut Self, TemplateError> {
        self.action(RouteMethod::Delete, path, action)
    }

    /// Registered paths in registration order.
    #[must_use]
    pub fn entries(&self) -> &[PathRoutes] {
        &self.routes
    }

    /// Number of distinct path templates.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of registered operations, one per path and method pair.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.iter().map(|r| r.methods().count()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Log a summary of the table once registration is finished.
    pub fn log_loaded(&self) {
        let routes_summary: Vec<String> = self
            .routes
            .iter()
            .flat_map(|r| {
                r.methods()
                    .map(move |(m, _)| format!("{m} {}", r.template.as_str()))
            })
            .take(10)
            .collect();
        info!(
            routes_count = self.len(),
            path_prefix = %self.prefix,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
    }

    /// Find the first registered path matching `path` that has `method`.
    ///
    /// A path that matches but lacks the method does not stop the search.
    #[must_use]
    pub fn route(&self, method: RouteMethod, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for entry in &self.routes {
            let Some(config) = entry.method(method) else {
                continue;
            };
            if let Some(path_params) = entry.template.match_path(path) {
                info!(
                    method = %method,
                    path = %path,
                    route_pattern = %entry.template,
                    path_params = ?path_params,
                    "Route matched"
                );
                return Some(RouteMatch {
                    method,
                    template: entry.template.as_str().to_string(),
                    config: config.clone(),
                    path_params,
                });
            }
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }
}
