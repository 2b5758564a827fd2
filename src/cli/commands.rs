use crate::app::build_service;
use crate::faker::{
    fill_many, parse_nested_query, resolve_path, supported_locales, LocaleRegistry, QueryOptions,
};
use crate::handlers::template::parse_count;
use crate::handlers::AppState;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;
use crate::server::{HttpServer, ServerHandle};
use crate::spec::load_spec;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the fake-data service
#[derive(Parser, Debug)]
#[command(name = "faker-api", version)]
#[command(about = "Locale-aware fake data over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// OpenAPI document that defines the routes
        #[arg(short, long, default_value = "doc/openapi.yaml")]
        spec: PathBuf,

        /// Directory holding the Swagger UI page
        #[arg(long, default_value = "doc")]
        doc_dir: PathBuf,

        /// Address to bind, overrides FAKER_API_ADDR
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the routes an OpenAPI document defines
    Routes {
        #[arg(short, long, default_value = "doc/openapi.yaml")]
        spec: PathBuf,
    },
    /// Print the supported locales, default first
    Locales,
    /// Resolve one dotted path and print it as JSON
    Resolve {
        locale: String,
        /// Dotted capability path, e.g. `person.fullName`
        path: String,
    },
    /// Fill a template given as a nested query string
    Template {
        locale: String,
        count: String,
        /// e.g. `name=person.fullName&address[city]=location.city`
        #[arg(default_value = "")]
        query: String,
    },
}

/// Parse the process arguments and run the chosen command.
///
/// # Errors
///
/// Propagates the command's failure.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();
    let stdout = std::io::stdout();
    run_command(cli.command, &config, &mut stdout.lock())
}

/// Run `command`, writing any output to `out`.
///
/// # Errors
///
/// Fails when the OpenAPI document cannot be loaded, the server cannot
/// bind, `count` is invalid or `out` cannot be written.
pub fn run_command(
    command: Commands,
    config: &RuntimeConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            spec,
            doc_dir,
            addr,
        } => {
            let addr = addr.unwrap_or_else(|| config.addr.clone());
            let handle = start_server(spec, doc_dir, &addr, config)?;
            info!(addr = %handle.addr(), "Server listening");
            wait_for_shutdown(handle)
        }
        Commands::Routes { spec } => {
            let spec_str = spec.to_str().context("OpenAPI document path is not valid UTF-8")?;
            let (routes, _slug) = load_spec(spec_str)?;
            for (method, path, handler) in Router::new(routes).describe_routes() {
                writeln!(out, "{:<7} {path} -> {handler}", method.as_str())?;
            }
            Ok(())
        }
        Commands::Locales => {
            for locale in supported_locales() {
                writeln!(out, "{locale}")?;
            }
            Ok(())
        }
        Commands::Resolve { locale, path } => {
            let provider = LocaleRegistry::new().resolve(&locale);
            let value = resolve_path(&provider, &path);
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            Ok(())
        }
        Commands::Template {
            locale,
            count,
            query,
        } => {
            let count = parse_count(&count, config.max_count)?;
            let provider = LocaleRegistry::new().resolve(&locale);
            let options = QueryOptions {
                depth: config.query_depth,
                ..QueryOptions::default()
            };
            let template = parse_nested_query(query.trim_start_matches('?'), &options);
            let filled = fill_many(&provider, &template, count, config.template_depth);
            writeln!(out, "{}", serde_json::to_string_pretty(&Value::Array(filled))?)?;
            Ok(())
        }
    }
}

fn start_server(
    spec: PathBuf,
    doc_dir: PathBuf,
    addr: &str,
    config: &RuntimeConfig,
) -> anyhow::Result<ServerHandle> {
    may::config().set_stack_size(config.stack_size);
    let state = Arc::new(AppState::from_config(config));
    let service = build_service(&spec, Some(doc_dir), config, state)?;
    HttpServer(service)
        .start(addr)
        .with_context(|| format!("binding {addr}"))
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    info!("Server stopped");
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))
}

