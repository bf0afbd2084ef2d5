use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::status::StatusHub;
use application::{CommandCompiler, PrinterBridge, PrinterService, RegistryOptions, SessionRegistry};
use bridge_agent::BridgeServer;
use infrastructure::{BridgeConfig, FsImageLoader, SimulatedSdk};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override the per-operation device timeout
    #[arg(long)]
    operation_timeout_ms: Option<u64>,
}

async fn run() -> Result<()> {
    dotenv().ok();

    // stdout carries the method channel
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,bridge_agent=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    info!(pid = std::process::id(), "Printer bridge starting");

    let mut config = BridgeConfig::load(&args.config_dir)?;
    if let Some(timeout_ms) = args.operation_timeout_ms {
        config.operation_timeout_ms = timeout_ms;
    }
    info!(
        config_dir = %args.config_dir,
        operation_timeout_ms = config.operation_timeout_ms,
        printers = config.simulator.printers.len(),
        "Configuration loaded"
    );

    let sdk = Arc::new(SimulatedSdk::from_configs(&config.simulator.printers)?);
    let registry = Arc::new(SessionRegistry::new(
        sdk,
        Arc::new(StatusHub::new()),
        RegistryOptions {
            operation_timeout: config.operation_timeout(),
            discovery_timeout: config.discovery_timeout(),
        },
    ));
    let compiler = CommandCompiler::new(Arc::new(FsImageLoader::new()));
    let service = Arc::new(PrinterService::new(registry.clone(), compiler));
    let server = BridgeServer::new(Arc::new(PrinterBridge::new(service)));

    tokio::select! {
        result = server.serve(tokio::io::stdin(), tokio::io::stdout()) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, disconnecting printers");
            if tokio::time::timeout(Duration::from_secs(5), registry.disconnect_all())
                .await
                .is_err()
            {
                warn!("Timed out disconnecting printers");
            }
        }
    }

    info!("Printer bridge stopped");
    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(run()) {
        eprintln!("Printer bridge failed: {e:?}");
        std::process::exit(1);
    }
}
