//! Scheduling and publish daemon.
//!
//! Periodically dispatches due queue entries and keeps every platform's
//! posting buffer topped up.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reeldesk_models::Platform;
use reeldesk_queue::{Dispatcher, HttpPublisher, QueueAllocator, SchedulerConfig};
use reeldesk_store::MemoryStore;

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reeldesk=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting reeldesk-daemon");

    let config = SchedulerConfig::from_env();
    info!("Scheduler config: {:?}", config);

    let tick: u64 = std::env::var("REELDESK_TICK_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);

    let store = Arc::new(MemoryStore::new());
    let publisher = match HttpPublisher::from_env() {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("Failed to create publisher: {}", e);
            std::process::exit(1);
        }
    };
    let allocator = QueueAllocator::new(store.clone(), config.clone());
    let dispatcher = Dispatcher::new(store, publisher, config);

    let mut interval = tokio::time::interval(Duration::from_secs(tick.max(1)));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match dispatcher.publish_due(Utc::now(), None).await {
                    Ok(results) if !results.is_empty() => {
                        info!(count = results.len(), "dispatch tick complete");
                    }
                    Ok(_) => {}
                    Err(e) => warn!("dispatch tick failed: {}", e),
                }
                match allocator.maintain_queue_buffer(Platform::video_channels()).await {
                    Ok(report) if report.replaced + report.topped_up > 0 => {
                        info!(
                            replaced = report.replaced,
                            topped_up = report.topped_up,
                            "buffer maintenance complete"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => warn!("buffer maintenance failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Daemon shutdown complete");
}
