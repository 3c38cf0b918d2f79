//! Waymark daemon — entry point for running the verification backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use waymark_rpc::{RpcServer, ServerConfig};
use waymark_store::contributor::ContributorStore;
use waymark_store::submission::SubmissionStore;
use waymark_store_memory::MemoryStore;

#[derive(Parser)]
#[command(name = "waymark-daemon", about = "Waymark verification backend daemon")]
struct Cli {
    /// Port for the REST server.
    #[arg(long, env = "WAYMARK_PORT")]
    port: Option<u16>,

    /// Disable permissive CORS (enabled by default for the map client).
    #[arg(long, env = "WAYMARK_DISABLE_CORS")]
    disable_cors: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file when set.
    #[arg(long, env = "WAYMARK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config_load_error = None;
    let file_config: Option<ServerConfig> = if let Some(ref config_path) = cli.config {
        match ServerConfig::from_toml_file(config_path) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                config_load_error = Some(e);
                None
            }
        }
    } else {
        None
    };

    let mut config = file_config.unwrap_or_default();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.disable_cors {
        config.enable_cors = false;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    waymark_utils::init_tracing(&config.log_level, config.log_format == "json");
    if let Some(e) = config_load_error {
        tracing::warn!("Failed to load config file: {e}, using CLI defaults");
    } else if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    tracing::info!(
        "Starting Waymark server (port {}, CORS {})",
        config.port,
        if config.enable_cors { "on" } else { "off" },
    );

    let store = Arc::new(MemoryStore::new());
    let server = RpcServer::new(
        config,
        Arc::clone(&store) as Arc<dyn ContributorStore>,
        store as Arc<dyn SubmissionStore>,
    );

    let started = Instant::now();
    tokio::select! {
        result = server.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(
                "Shutdown signal received after {} — stopping server",
                waymark_utils::format_duration(started.elapsed().as_secs()),
            );
        }
    }

    tracing::info!("Waymark daemon exited cleanly");
    Ok(())
}
