mod app;
mod config;
mod graph;
mod layout;
mod samband;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::RootSpec;
use crate::config::Settings;
use crate::graph::ViewMode;
use crate::samband::{ClientOptions, HierarchyClient};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Id of the samband the graph is centred on
    #[arg(long)]
    samband: String,

    /// Display name of the root samband; looked up from the API when omitted
    #[arg(long)]
    name: Option<String>,

    /// Reference code (sambandsnummer) of the root samband
    #[arg(long)]
    sambandsnummer: Option<String>,

    /// Base URL of the Nautobot instance
    #[arg(long)]
    base_url: Option<String>,

    /// Initial hierarchy depth
    #[arg(long)]
    depth: Option<u32>,

    /// Initial view mode
    #[arg(long, value_enum)]
    mode: Option<ViewMode>,

    /// Project config file (defaults to ./samband-graph.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(base_url) = args.base_url {
        settings.api.base_url = base_url;
    }
    if let Some(depth) = args.depth {
        settings.view.default_depth = depth;
    }
    if let Some(mode) = args.mode {
        settings.view.default_mode = mode;
    }

    let client = HierarchyClient::new(ClientOptions {
        base_url: settings.api.base_url.clone(),
        token: settings.api.token.clone(),
        timeout: settings.api.timeout(),
    })
    .context("failed to build HTTP client")?;

    let root = resolve_root(&client, args.samband, args.name, args.sambandsnummer);
    info!(root = %root.id, base_url = %client.base_url(), "starting samband graph viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "samband-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::SambandGraphApp::new(cc, client, settings, root)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer exited with an error: {error}"))
}

fn resolve_root(
    client: &HierarchyClient,
    id: String,
    name: Option<String>,
    sambandsnummer: Option<String>,
) -> RootSpec {
    if let Some(name) = name {
        return RootSpec {
            id,
            name,
            sambandsnummer: sambandsnummer.unwrap_or_default(),
        };
    }

    match client.fetch_summary(&id) {
        Ok(summary) => RootSpec {
            id,
            name: summary
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Unknown Connection".to_owned()),
            sambandsnummer: sambandsnummer
                .or(summary.sambandsnummer)
                .unwrap_or_default(),
        },
        Err(error) => {
            warn!(%error, samband = %id, "could not look up samband details");
            RootSpec {
                id,
                name: "Unknown Connection".to_owned(),
                sambandsnummer: sambandsnummer.unwrap_or_default(),
            }
        }
    }
}
