//! Deckbridge demo host.
//!
//! Stands in for the host shell: builds a page session, brings up both
//! runtime locations, registers their bridges, and fires the manifest's
//! ribbon commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deckbridge::bridge::{BridgeRegistrar, BridgeRegistry, SERVER_BRIDGE, WASM_BRIDGE};
use deckbridge::config::DispatchConfig;
use deckbridge::dispatch::{CommandDispatcher, CommandManifest, CommandSurface};
use deckbridge::handlers::{ClientCommandHandler, ServerCommandHandler};
use deckbridge::host::{CompletionToken, ConsoleHost};

/// Deckbridge demo host
#[derive(Parser, Debug)]
#[command(name = "deckbridge")]
#[command(about = "Dual-runtime add-in command bridge demo", long_about = None)]
struct Args {
    /// Path to a TOML command manifest (built-in demo commands if omitted)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bridge readiness timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Fire a single command id instead of the whole manifest
    #[arg(long)]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deckbridge=info,deckbridge_runtime=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting deckbridge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = DispatchConfig::load(args.config.as_deref())?;
    if let Some(timeout_ms) = args.timeout_ms {
        config.ready_timeout_ms = timeout_ms;
    }

    let manifest = match &args.manifest {
        Some(path) => CommandManifest::load(path)?,
        None => CommandManifest::builtin(),
    };

    // Page session state
    let registry = Arc::new(BridgeRegistry::new());
    let dispatcher = Arc::new(CommandDispatcher::new(
        registry.clone(),
        Arc::new(ConsoleHost),
        &config,
    ));
    let surface = CommandSurface::new(dispatcher, manifest);

    // Server runtime location: worker context reached over its command channel
    let server_runtime = Arc::new(deckbridge_runtime::spawn(
        SERVER_BRIDGE,
        ServerCommandHandler,
    )?);
    let server_registrar = BridgeRegistrar::new(registry.clone(), SERVER_BRIDGE);
    server_registrar.register_runtime(server_runtime.clone()).await?;

    // Wasm runtime location: in-page handler, invoked in-process
    let client_registrar = BridgeRegistrar::new(registry.clone(), WASM_BRIDGE);
    client_registrar.register_handler(Arc::new(ClientCommandHandler));

    let ids: Vec<String> = match args.command {
        Some(id) => vec![id],
        None => {
            let mut ids = surface.command_ids();
            ids.sort();
            ids
        }
    };

    let fired = ids.iter().map(|id| {
        let (token, receipt) = CompletionToken::new(id.as_str());
        let surface = &surface;
        async move {
            let outcome = surface.fire(id, token).await;
            (id, outcome, receipt.completed().await)
        }
    });

    for (id, outcome, completed) in futures::future::join_all(fired).await {
        info!(command = %id, completed, outcome = %outcome, "command finished");
    }

    drop(client_registrar);
    drop(server_registrar);
    server_runtime.terminate();

    Ok(())
}
