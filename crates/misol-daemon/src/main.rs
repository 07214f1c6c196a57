//! Misol station daemon
//!
//! Reads frames from a byte source (simulated station or a recorded capture),
//! decodes them and publishes every channel to the log and optional JSONL file.

mod scheduler;

use anyhow::{Context, Result};
use misol_config::{AppConfig, SourceKind};
use misol_core::{link, ByteSource};
use misol_sinks::{FanoutSink, JsonlSink, LogSink};
use misol_station::{ReplaySource, SimulatorSource, WeatherStation};
use tracing::{info, warn};

use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> Result<()> {
    misol_obs::init("misold");

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!(?config, "Loaded configuration");
    info!(
        baud = link::BAUD_RATE,
        data_bits = link::DATA_BITS,
        stop_bits = link::STOP_BITS,
        "Station link parameters"
    );

    let source = build_source(&config)?;
    let sink = build_sink(&config)?;
    let station = WeatherStation::new(source, sink, config.station.clone());
    let mut scheduler = Scheduler::new(station, config.poll_interval());

    info!("Daemon running - press Ctrl+C to stop");
    let totals = scheduler.run(shutdown_signal()).await?;

    info!(frames = totals.frames, "Misol daemon stopped");
    Ok(())
}

fn build_source(config: &AppConfig) -> Result<Box<dyn ByteSource>> {
    match config.daemon.source {
        SourceKind::Simulator => {
            info!(period_secs = config.daemon.simulator_period_secs, "Using simulated station");
            Ok(Box::new(SimulatorSource::new(config.simulator_period())))
        }
        SourceKind::Replay => {
            let path = config
                .daemon
                .replay_path
                .as_ref()
                .context("replay source needs replay_path")?;
            let replay = ReplaySource::open(path, config.daemon.replay_chunk)
                .with_context(|| format!("Failed to open capture {}", path.display()))?;
            Ok(Box::new(replay))
        }
    }
}

fn build_sink(config: &AppConfig) -> Result<FanoutSink> {
    let mut sink = FanoutSink::new().with(LogSink::new());
    if let Some(dir) = &config.daemon.jsonl_dir {
        let jsonl = JsonlSink::new(dir)
            .with_context(|| format!("Failed to open JSONL sink in {}", dir.display()))?;
        info!(path = %jsonl.path().display(), "Writing JSONL snapshots");
        sink = sink.with(jsonl);
    }
    Ok(sink)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
