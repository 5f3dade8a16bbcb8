use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use agency_api::config::Config;
use agency_api::contracts::ApiRegistry;
use agency_api::logging;
use agency_api::openapi;
use agency_api::rest;
use agency_api::version::VersionSources;

#[derive(Parser)]
#[command(name = "agency-api")]
#[command(about = "Contract registry and meta API for the agency CMS backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the meta API server
    Serve {
        /// Port to listen on (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the discovery document
    Spec {
        /// API version (default: configured default)
        #[arg(long)]
        api_version: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Print or write the OpenAPI 3.0.3 document
    Openapi {
        #[arg(long)]
        api_version: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered endpoints
    Endpoints {
        #[arg(long)]
        api_version: Option<String>,
    },

    /// Check the catalog for duplicate keys, orphan required fields and
    /// misplaced deprecations
    Lint,

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Serve { port } => cmd_serve(config, port).await?,
        Commands::Spec {
            api_version,
            format,
        } => cmd_spec(&config, api_version.as_deref(), format)?,
        Commands::Openapi {
            api_version,
            format,
            output,
        } => cmd_openapi(&config, api_version.as_deref(), format, output)?,
        Commands::Endpoints { api_version } => cmd_endpoints(&config, api_version.as_deref()),
        Commands::Lint => cmd_lint(&config)?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

/// Resolve a CLI-supplied version the same way a request would
fn resolve_version(registry: &ApiRegistry, requested: Option<&str>) -> String {
    registry.resolver().resolve(VersionSources {
        explicit: requested,
        ..VersionSources::default()
    })
}

fn render(document: &serde_json::Value, format: Format) -> Result<String> {
    match format {
        Format::Json => openapi::to_json(document).context("Failed to render JSON"),
        Format::Yaml => openapi::to_yaml(document).context("Failed to render YAML"),
    }
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, port))?;

    let state = rest::ApiState::new(config);
    for warning in state.registry.lint() {
        tracing::warn!("{}", warning);
    }

    println!("Starting meta API server...");
    println!("  Address:   http://{}", addr);
    println!("  Contracts: {}", state.registry.len());
    println!("  Versions:  {}", state.registry.supported_versions().join(", "));
    println!("  Endpoints:");
    println!("    GET  /api/health                          Health check");
    println!("    GET  /api/meta                            Discovery document");
    println!("    GET  /api/meta/endpoints                  Grouped endpoints");
    println!("    GET  /api/meta/openapi                    OpenAPI 3.0.3 (?format=yaml)");
    println!("    GET  /api/meta/validation/{{method}}/{{path}} Derived validation rules");
    println!();

    rest::serve(state, addr).await
}

fn cmd_spec(config: &Config, api_version: Option<&str>, format: Format) -> Result<()> {
    let registry = ApiRegistry::build(config.api.versioning.clone());
    let version = resolve_version(&registry, api_version);
    let spec = serde_json::to_value(registry.spec(&config.app, Some(&version)))
        .context("Failed to serialize discovery document")?;
    println!("{}", render(&spec, format)?);
    Ok(())
}

fn cmd_openapi(
    config: &Config,
    api_version: Option<&str>,
    format: Format,
    output: Option<PathBuf>,
) -> Result<()> {
    let registry = ApiRegistry::build(config.api.versioning.clone());
    let version = resolve_version(&registry, api_version);
    let document = openapi::generate(&registry, &config.app, Some(&version));
    let rendered = render(&document, format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("OpenAPI {} document written to {}", version, path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn cmd_endpoints(config: &Config, api_version: Option<&str>) {
    let registry = ApiRegistry::build(config.api.versioning.clone());
    let version = resolve_version(&registry, api_version);
    let grouped = registry.grouped(Some(&version));
    let total: usize = grouped.values().map(Vec::len).sum();

    println!("Endpoints for {} ({} total)", version, total);
    println!("{}", "─".repeat(96));
    println!(
        "{:<7} {:<45} {:<20} {:<8} {}",
        "METHOD", "PATH", "GROUP", "AUTH", "DEPRECATED"
    );

    for (group, docs) in &grouped {
        for doc in docs {
            let auth = doc.authentication.guard.as_deref().unwrap_or("-");
            println!(
                "{:<7} {:<45} {:<20} {:<8} {}",
                doc.method.as_str(),
                doc.path,
                group,
                auth,
                if doc.deprecated { "yes" } else { "" }
            );
        }
    }
}

fn cmd_lint(config: &Config) -> Result<()> {
    let registry = ApiRegistry::build(config.api.versioning.clone());
    let warnings = registry.lint();

    if warnings.is_empty() {
        println!("✓ {} contracts, no warnings", registry.len());
        return Ok(());
    }

    for warning in &warnings {
        println!("  ! {}", warning);
    }
    bail!("{} registry warning(s)", warnings.len())
}
