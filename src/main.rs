//! Ingress configuration controller.
//!
//! # Architecture Overview
//!
//! ```text
//!   <config-dir>/*.toml ──▶ SourceWatcher ──▶ pump ──▶ Store (Registry)
//!                                                        │
//!                                                        │ load()
//!                                                        ▼
//!   Client ──▶ HTTP server ──▶ attach_config ──▶ handlers ──▶ override resolver
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use ingress_config::domains::IstioConfig;
use ingress_config::http::HttpServer;
use ingress_config::lifecycle::{signals, Shutdown};
use ingress_config::observability::{logging, metrics};
use ingress_config::settings::{resolve_settings, SettingsOverrides};
use ingress_config::source::{pump, SourceWatcher};
use ingress_config::store::{Store, UpdateCallback};

#[derive(Parser, Debug)]
#[command(name = "ingress-config", about = "Watch ingress configuration sources and serve the current snapshot")]
struct Args {
    /// Controller settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Directory of `<domain>.toml` config sources; overrides the settings file.
    #[arg(long)]
    config_dir: Option<String>,

    /// HTTP bind address; overrides the settings file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = resolve_settings(
        args.settings.as_deref(),
        SettingsOverrides {
            config_dir: args.config_dir,
            bind_address: args.bind,
        },
    )?;

    logging::init(&settings.observability.log_level);
    tracing::info!("ingress-config v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.observability.metrics_enabled {
        let addr: SocketAddr = settings.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let store = Store::new(vec![gateway_summary()])?;
    let config_dir = PathBuf::from(&settings.source.config_dir);

    // Initial sync, then follow changes
    signals::resync(&store, &config_dir);

    let shutdown = Shutdown::new();
    let (watcher, events) = SourceWatcher::new(
        &config_dir,
        Duration::from_millis(settings.source.poll_interval_ms),
    );
    let _watcher = watcher.run()?;
    let pump_task = tokio::spawn(pump::run(store.clone(), events, shutdown.subscribe()));

    signals::spawn_resync_on_hangup(store.clone(), config_dir, shutdown.clone());
    signals::spawn_shutdown_listener(shutdown.clone());

    let listener = TcpListener::bind(&settings.listener.bind_address).await?;
    HttpServer::new(store, &settings.listener)
        .run(listener, shutdown.clone())
        .await?;

    // The server only returns after shutdown; make sure the pump saw it too.
    shutdown.trigger();
    let _ = pump_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log the gateway layout whenever `config-istio` changes.
fn gateway_summary() -> UpdateCallback {
    Arc::new(|domain, value| {
        let Some(istio) = value.downcast_ref::<IstioConfig>() else {
            return;
        };
        let names = |gateways: &[ingress_config::domains::Gateway]| {
            gateways
                .iter()
                .map(|g| g.qualified_name())
                .collect::<Vec<_>>()
                .join(",")
        };
        tracing::info!(
            domain = %domain,
            ingress_gateways = %names(&istio.ingress_gateways),
            local_gateways = %names(&istio.local_gateways),
            "Gateways configured"
        );
    })
}
