use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use swarm_patrol::adapters::inbound::WebSocketServer;
use swarm_patrol::adapters::outbound::FilesystemGeofenceSource;
use swarm_patrol::application::{CommandProcessor, GroundControl};
use swarm_patrol::domains::fleet::{FleetSettings, GeofenceSource};
use swarm_patrol::Config;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Geofenced UAV swarm patrol simulator")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(&args.config).await?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting swarm patrol");
    info!(agents = config.swarm.agent_count, tick_ms = config.swarm.tick_interval_ms, "Swarm configuration loaded");

    let (outbound_tx, outbound_rx) = mpsc::channel(config.server.outbound_capacity);
    let ground_control = Arc::new(GroundControl::new(outbound_tx, FleetSettings::from(&config.swarm)));

    if let Some(path) = &config.geofence_file {
        let source = FilesystemGeofenceSource::new(None);
        let loaded = source.load_geofence(&path.to_string_lossy());
        match loaded {
            Ok(points) => match ground_control.update_geofence(points).await {
                Ok(snapshot) => info!(vertices = snapshot.fenced_area.len(), "Initial geofence applied"),
                Err(e) => error!("Failed to apply initial geofence: {}", e),
            },
            Err(e) => error!("Failed to load {}: {}", path.display(), e),
        }
    }

    let processor = Arc::new(CommandProcessor::new(ground_control.clone()));
    let server = WebSocketServer::new(processor, outbound_rx);
    let address = config.bind_address();

    tokio::select! {
        result = server.run(&address) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down swarm patrol"),
    }

    ground_control.shutdown().await;
    Ok(())
}
