//! RF Pulse Decoder - sub-GHz OOK capture decoder
//!
//! Reads compressed pulse captures from a receiver, identifies the protocol
//! by pulse timing and prints decoded frames as JSON lines on stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rf_pulse_decoder::capture::CaptureRunner;
use rf_pulse_decoder::config::Config;
use rf_pulse_decoder::decoder::PulseDecoder;
use rf_pulse_decoder::protocol::Catalog;
use rf_pulse_decoder::pulse::CompressedFormat;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stdout carries decoded frames, logs go to stderr)
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rf_pulse_decoder=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!("===========================================");
    info!("   RF Pulse Decoder - sub-GHz OOK");
    info!("===========================================");

    let config = Config::from_env();

    let catalog = match &config.protocols_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load protocol catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    info!("Configuration:");
    match &config.capture_command {
        Some(cmd) => info!("  Receiver: {} {}", cmd, config.capture_args.join(" ")),
        None => info!("  Receiver: stdin"),
    }
    match &config.protocols_path {
        Some(path) => info!("  Protocols: {} ({} loaded)", path.display(), catalog.len()),
        None => info!("  Protocols: built-in ({} loaded)", catalog.len()),
    }
    info!("  Tolerance: {:.1}%", config.tolerance.ratio() * 100.0);
    info!("  Header slots: {}", config.header_slots);

    let decoder = PulseDecoder::new(
        catalog,
        CompressedFormat::new(config.header_slots),
        config.tolerance,
    );

    if decoder.catalog().is_empty() {
        warn!("Protocol catalog is empty, no capture will decode");
    }
    for protocol in decoder.catalog().iter() {
        debug!(
            "  {}: lengths={:?} events={:?} code_width={} footers={:?}",
            protocol.name(),
            protocol.lengths(),
            protocol.seq_lengths(),
            protocol.codes().width(),
            protocol.codes().footers().collect::<Vec<_>>()
        );
    }

    // Raw records from the receiver
    let (record_tx, mut record_rx) = mpsc::channel::<Vec<u8>>(1000);

    let runner = Arc::new(CaptureRunner::new(config.capture_source()));
    let capture_runner = runner.clone();
    let capture_handle = tokio::spawn(async move {
        if let Err(e) = capture_runner.run(record_tx).await {
            error!("Capture failed: {:#}", e);
        }
    });

    info!("===========================================");
    info!("  Waiting for captures...");
    info!("  Press Ctrl+C to stop.");
    info!("===========================================");

    let mut stats_tick = tokio::time::interval(Duration::from_millis(config.stats_interval_ms));
    stats_tick.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            record = record_rx.recv() => {
                let Some(record) = record else {
                    info!("Capture channel closed");
                    break;
                };

                match decoder.decode_record(&record) {
                    Ok(frames) => {
                        for frame in frames {
                            info!(
                                "[{}] {} bits: {}",
                                frame.protocol,
                                frame.bit_count(),
                                frame.payload_hex
                            );
                            match serde_json::to_string(&frame) {
                                Ok(line) => println!("{}", line),
                                Err(e) => warn!("Failed to serialize frame: {}", e),
                            }
                        }
                    }
                    Err(e) => {
                        // Bad capture, skip it and keep going
                        debug!("Discarding capture: {}", e);
                    }
                }
            }
            _ = stats_tick.tick() => {
                info!("[Decoder] {}", decoder.stats().snapshot());
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }

    if runner.is_running() {
        runner.stop();
    }
    capture_handle.abort();

    info!("Shutdown complete. {}", decoder.stats().snapshot());
    Ok(())
}
