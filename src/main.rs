use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use ovsx_badge::badge::{self, BadgeKind, DEFAULT_COLOR, DEFAULT_LABEL, KEYWORDS};
use ovsx_badge::config::{self, AppConfig};
use ovsx_badge::logging;
use ovsx_badge::openvsx::{LookupRequest, RegistryExtensionLookup, ReqwestFetcher};

#[derive(Parser)]
#[command(name = "ovsx-badge")]
#[command(version, about = "Open VSX extension lookup for badges")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Registry base URL, overrides the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the validated extension record as JSON
    Lookup(ExtensionArgs),
    /// Print badge data for the extension as JSON
    Badge {
        #[arg(value_enum)]
        kind: BadgeKind,
        #[command(flatten)]
        extension: ExtensionArgs,
    },
    /// Print the default badge label, color and search keywords
    Info,
}

#[derive(clap::Args)]
struct ExtensionArgs {
    namespace: String,
    extension: String,
    #[arg(long)]
    version: Option<String>,
}

impl ExtensionArgs {
    fn request(&self) -> LookupRequest {
        let request = LookupRequest::new(&self.namespace, &self.extension);
        match &self.version {
            Some(version) => request.with_version(version),
            None => request,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = match &cli.config {
        Some(path) => AppConfig::load_required(path)?,
        None => AppConfig::load(&config::config_path())?,
    };
    if let Some(base_url) = &cli.base_url {
        app_config.registry.base_url = base_url.clone();
    }

    let log_file = app_config.log.file.then(config::log_path);
    let _guard = logging::init(
        logging::verbosity_level(&app_config.log.level, cli.verbose),
        log_file.as_deref(),
    )?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, app_config))
}

async fn run(command: Command, app_config: AppConfig) -> anyhow::Result<()> {
    let output = match command {
        Command::Info => json!({
            "label": DEFAULT_LABEL,
            "color": DEFAULT_COLOR,
            "keywords": KEYWORDS,
        }),
        Command::Lookup(args) => {
            let lookup = build_lookup(&app_config)?;
            let record = lookup.fetch(&args.request()).await?;
            serde_json::to_value(record)?
        }
        Command::Badge { kind, extension } => {
            let lookup = build_lookup(&app_config)?;
            let data = badge::fetch_badge(&lookup, kind, &extension.request()).await;
            serde_json::to_value(data)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_lookup(app_config: &AppConfig) -> anyhow::Result<RegistryExtensionLookup> {
    let fetcher = ReqwestFetcher::from_config(&app_config.registry)?;
    Ok(RegistryExtensionLookup::new(
        Arc::new(fetcher),
        &app_config.registry.base_url,
    ))
}
