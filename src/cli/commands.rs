use crate::config::ServiceConfig;
use crate::demo::{demo_routes, PostStore};
use crate::dispatcher::Dispatcher;
use crate::router::{RouteMethod, RouteTable};
use crate::spec::generate_openapi_document;
use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use http::Method;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line interface for the action router
///
/// Every command runs against the built-in demo blog actions.
#[derive(Debug, Parser)]
#[command(name = "action-router")]
#[command(about = "Typed actions behind path templates, with generated OpenAPI", long_about = None)]
pub struct Cli {
    /// Log level for events written to stderr
    #[arg(long, global = true, env = "ACTION_ROUTER_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Service configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the OpenAPI document generated from the registered actions
    Spec {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show which route a request path resolves to
    Route {
        /// GET, POST, PUT or DELETE
        method: RouteMethod,
        /// Request path, e.g. /posts/42
        path: String,
    },
    /// Dispatch one request and print the status and JSON body
    Invoke {
        /// HTTP method
        method: String,
        /// Path with optional query string, or an absolute URL
        url: String,
        /// JSON request body (POST and PUT)
        #[arg(short, long)]
        body: Option<String>,
    },
}

fn load_routes(config: &ServiceConfig) -> anyhow::Result<RouteTable> {
    demo_routes(&config.path_prefix, Arc::new(PostStore::seeded()))
        .context("Failed to register demo routes")
}

/// Run a parsed command, writing its result to `out`.
///
/// # Errors
///
/// Returns an error if:
/// - The service configuration cannot be loaded
/// - Document generation fails on a schema contract violation
/// - `route` finds no matching route
/// - Output cannot be written
pub fn run_cli(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = ServiceConfig::load(cli.config.as_deref())?;
    let routes = load_routes(&config)?;

    match &cli.command {
        Commands::Spec { format, output } => {
            let document = generate_openapi_document(&routes, &config.info)?;
            let rendered = match format {
                OutputFormat::Json => document.to_json_pretty()?,
                OutputFormat::Yaml => document.to_yaml()?,
            };
            match output {
                Some(path) => std::fs::write(path, rendered)
                    .with_context(|| format!("Failed to write document: {}", path.display()))?,
                None => writeln!(out, "{rendered}")?,
            }
        }
        Commands::Route { method, path } => {
            let matched = routes
                .route(*method, path)
                .ok_or_else(|| anyhow!("No route for {method} {path}"))?;
            let params: Map<String, Value> = matched
                .path_params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                .collect();
            let metadata = matched.config.source.schemas().metadata;
            let summary = json!({
                "method": matched.method.as_str(),
                "route": matched.template,
                "action": metadata.name,
                "params": params,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        Commands::Invoke { method, url, body } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {method}"))?;
            if let Some(body) = body {
                if serde_json::from_str::<Value>(body).is_err() {
                    bail!("--body is not valid JSON");
                }
            }
            let dispatcher = Dispatcher::new(Arc::new(routes));
            let response = dispatcher.handle(&method, url, body.as_deref().map(str::as_bytes));
            writeln!(out, "{}", response.status)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&response.body)?)?;
        }
    }
    Ok(())
}
