//! lattice
//!
//! Serves the components that ship with the crate, discovered by file
//! convention.
//!
//! # Architecture Overview
//!
//! ```text
//!   lattice.toml + CLI flags
//!          │
//!          ▼
//!   ┌─────────────┐   paths    ┌─────────────┐  ordered   ┌──────────────┐
//!   │  discovery  │──────────▶│   orderer   │──────────▶│    loader    │
//!   │ glob / link │            │ mw first    │            │ linkage table│
//!   └─────────────┘            └─────────────┘            └──────┬───────┘
//!                                                                │ descriptors
//!                                                                ▼
//!   ┌─────────────┐  compiled  ┌─────────────┐  bindings  ┌──────────────┐
//!   │ axum::serve │◀───────────│ HttpRouter  │◀───────────│    driver    │
//!   │  + shutdown │            │ route table │            │  sequential  │
//!   └─────────────┘            └─────────────┘            └──────────────┘
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use lattice::component::StaticLoader;
use lattice::config::{load_config, AppConfig, DiscoverySource};
use lattice::lifecycle::signals::shutdown_signal;
use lattice::observability::{logging, metrics};
use lattice::{components, Lattice};

const DEFAULT_CONFIG: &str = "lattice.toml";

#[derive(Parser, Debug)]
#[command(name = "lattice", version, about = "Serve convention-discovered components")]
struct Cli {
    /// Config file. Defaults to ./lattice.toml when it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discovery root
    #[arg(short, long)]
    dir: Option<PathBuf>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    host: Option<String>,

    /// Discover from the linkage table instead of the filesystem
    #[arg(long)]
    linked: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lattice starting");

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => load_config(Path::new(DEFAULT_CONFIG))?,
        None => AppConfig::with_dir(components::source_dir()),
    };

    if let Some(dir) = cli.dir {
        config.dir = dir;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if cli.linked {
        config.discovery = DiscoverySource::Linked;
    }

    tracing::info!(
        dir = %config.dir.display(),
        patterns = ?config.patterns(),
        discovery = ?config.discovery,
        address = %config.listen_address(),
        "Configuration loaded"
    );

    if let Some(address) = &config.metrics_address {
        match address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address"),
        }
    }

    let loader = components::link(StaticLoader::new(&config.dir));
    let app = Lattice::builder(config).linked(loader).build();

    let listening = app.serve().await?;
    tracing::info!(address = %listening.local_addr(), "Ready");

    shutdown_signal().await;
    listening.shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
