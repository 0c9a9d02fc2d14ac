use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tlspc_client::Client;
use tlspc_provider::{ProviderConfig, TlspcProvider};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tlspc")]
#[command(version, about = "Drive Venafi TLS Protect Cloud resources from JSON documents", long_about = None)]
struct Cli {
    /// API key, overriding the configuration file
    #[arg(long, global = true)]
    apikey: Option<String>,

    /// API endpoint, overriding the configuration file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Provider configuration file (JSON with apikey/endpoint). Environment
    /// variables TLSPC_APIKEY and TLSPC_ENDPOINT fill in anything unset.
    #[arg(long, global = true)]
    provider_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print published schemas
    Schema {
        /// Only this resource or data source
        #[arg(long = "type")]
        type_name: Option<String>,
    },
    /// List resource and data source type names
    Resources,
    /// Create a resource from its planned configuration
    Create {
        #[arg(long = "type")]
        type_name: String,
        /// Planned configuration (JSON file, "-" for stdin)
        #[arg(long)]
        planned: PathBuf,
    },
    /// Refresh a resource from its stored state
    Read {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        state: PathBuf,
    },
    /// Move a resource from its stored state to a new plan
    Update {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        planned: PathBuf,
    },
    /// Delete a resource
    Delete {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        state: PathBuf,
    },
    /// Adopt an existing object by identifier
    Import {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        id: String,
    },
    /// Evaluate a data source
    Data {
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        config: PathBuf,
    },
}

fn read_json(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn provider_config(path: Option<&Path>) -> Result<ProviderConfig> {
    match path {
        None => Ok(ProviderConfig::default()),
        Some(path) => {
            tracing::debug!("Loading provider configuration from {}", path.display());
            let value = read_json(path)?;
            serde_json::from_value(value)
                .with_context(|| format!("invalid provider configuration in {}", path.display()))
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // Schema listing never talks to the API, so it works without credentials.
    let offline = || TlspcProvider::with_api(Arc::new(Client::new("", None, VERSION)));
    let configured = || -> Result<TlspcProvider> {
        let mut config = provider_config(cli.provider_config.as_deref())?;
        if cli.apikey.is_some() {
            config.apikey = cli.apikey.clone();
        }
        if cli.endpoint.is_some() {
            config.endpoint = cli.endpoint.clone();
        }
        Ok(TlspcProvider::configure(&config, VERSION)?)
    };

    match &cli.command {
        Commands::Schema { type_name } => {
            let provider = offline();
            match type_name {
                Some(t) => print_json(&provider.schema(t)?)?,
                None => print_json(&provider.schemas())?,
            }
        }
        Commands::Resources => {
            let provider = offline();
            println!("{}", "Resources:".bold());
            for t in provider.resource_types() {
                println!("  {}", t);
            }
            println!("{}", "Data sources:".bold());
            for t in provider.data_source_types() {
                println!("  {}", t);
            }
        }
        Commands::Create { type_name, planned } => {
            let planned = read_json(planned)?;
            let state = configured()?.create(type_name, planned).await?;
            print_json(&state)?;
        }
        Commands::Read { type_name, state } => {
            let state = read_json(state)?;
            let state = configured()?.read(type_name, state).await?;
            print_json(&state)?;
        }
        Commands::Update {
            type_name,
            state,
            planned,
        } => {
            let state = read_json(state)?;
            let planned = read_json(planned)?;
            let state = configured()?.update(type_name, state, planned).await?;
            print_json(&state)?;
        }
        Commands::Delete { type_name, state } => {
            let state = read_json(state)?;
            configured()?.delete(type_name, state).await?;
            eprintln!("{} deleted {}", "✓".green(), type_name);
        }
        Commands::Import { type_name, id } => {
            let state = configured()?.import(type_name, id).await?;
            print_json(&state)?;
        }
        Commands::Data { type_name, config } => {
            let config = read_json(config)?;
            let state = configured()?.read_data_source(type_name, config).await?;
            print_json(&state)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries JSON documents, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
