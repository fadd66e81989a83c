mod intake;
mod logging;
mod metrics;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ingress_core::{
    create_tracker, load_config, outcome_channels, validate_config, Announcer, AnnouncerBackend,
    Collaborators, Inventory, JsonLinesAnnouncer, LocalStager, LogAnnouncer, Pipeline,
    ServiceDescriptor, ServiceRegistry, SimulationValidator, StaticInventory, Tracker,
};

use intake::{Args, Intake};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long to wait for the event loop after cancelling it
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config.clone();

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    logging::init(&config.logging);
    info!("ingress {} starting", VERSION);
    info!("Configuration loaded from {:?}", config_path);
    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );
    Lazy::force(&metrics::REGISTRY);

    let cancel = CancellationToken::new();
    let (outcome_tx, outcome_rx) = outcome_channels(config.pipeline.outcome_capacity);

    let stager = Arc::new(LocalStager::new(&config.staging.root));
    info!("Staging payloads under {:?}", config.staging.root);

    let registry = ServiceRegistry::from_map(config.validator.services.clone());
    info!("Accepting {} services", registry.len());
    let validator = Arc::new(SimulationValidator::new(
        config.validator.simulation.clone(),
        registry,
        outcome_tx,
        cancel.clone(),
    ));

    let (announcer, sink): (Arc<dyn Announcer>, Arc<dyn Tracker>) =
        match config.announcer.backend {
            AnnouncerBackend::Log => {
                let log = Arc::new(LogAnnouncer::new());
                let announcer: Arc<dyn Announcer> = log.clone();
                let tracker: Arc<dyn Tracker> = log;
                (announcer, tracker)
            }
            AnnouncerBackend::JsonLines => {
                let path = config
                    .announcer
                    .path
                    .as_ref()
                    .context("announcer.path is required for json_lines")?;
                let lines = Arc::new(
                    JsonLinesAnnouncer::open(path)
                        .await
                        .with_context(|| format!("Failed to open {:?}", path))?,
                );
                info!("Announcing to {:?}", lines.path());
                let announcer: Arc<dyn Announcer> = lines.clone();
                let tracker: Arc<dyn Tracker> = lines;
                (announcer, tracker)
            }
        };

    // Status records and announcements share one buffered writer so they
    // reach the sinks in emission order
    let (tracker, tracker_writer) =
        create_tracker(sink, announcer, config.pipeline.tracker_buffer);
    let writer_handle = tokio::spawn(tracker_writer.run());

    let inventory: Option<Arc<dyn Inventory>> = config.inventory.as_ref().map(|inv| {
        info!("Using static inventory id {}", inv.static_id);
        Arc::new(StaticInventory::new(&inv.static_id)) as Arc<dyn Inventory>
    });

    let collaborators = Collaborators {
        stager,
        validator,
        announcer: Arc::new(tracker.clone()),
        tracker: Arc::new(tracker),
        inventory,
    };
    let pipeline = Pipeline::with_service_name(
        collaborators,
        outcome_rx,
        cancel.clone(),
        &config.pipeline.service_name,
    );
    let handle = pipeline.handle();

    let (done_tx, mut done_rx) = oneshot::channel();
    let loop_handle = tokio::spawn(pipeline.start(done_tx));

    let descriptor = ServiceDescriptor::new(&args.service, &args.category);
    handle
        .admit(&descriptor)
        .with_context(|| format!("Payloads for {} are not accepted", descriptor))?;

    let intake = Intake::from_args(&args);

    let mut submissions = JoinSet::new();
    for path in args.files {
        let (input, request) = match intake.open(&path).await {
            Ok(opened) => opened,
            Err(e) => {
                warn!("Skipping payload: {:#}", e);
                continue;
            }
        };
        info!(request_id = %request.request_id, "Submitting {:?}", path);
        let handle = handle.clone();
        submissions.spawn(async move { handle.submit(input, request).await });
    }
    while let Some(result) = submissions.join_next().await {
        if let Err(e) = result {
            warn!("Submission task failed: {}", e);
        }
    }
    info!("All payloads submitted, waiting for outcomes (Ctrl+C to stop)");

    let loop_finished = tokio::select! {
        _ = shutdown_signal() => false,
        _ = &mut done_rx => true,
    };

    if loop_finished {
        info!("Outcome channels closed, pipeline stopped");
    } else {
        info!("Shutting down...");
    }
    cancel.cancel();

    // The writer exits once every tracker handle is gone; the pipeline and
    // its handle own the last ones.
    drop(handle);
    join_event_loop(loop_handle, SHUTDOWN_TIMEOUT).await;
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, writer_handle).await {
        Ok(Ok(())) => info!("Status writer stopped"),
        Ok(Err(e)) => warn!("Status writer task failed: {}", e),
        Err(_) => warn!("Status writer did not drain in time"),
    }

    debug!("Final metrics:\n{}", metrics::render());

    Ok(())
}

/// Wait up to `limit` for the event loop task, aborting it if it is still
/// running. Returns false if it had to be aborted.
async fn join_event_loop(mut task: JoinHandle<()>, limit: Duration) -> bool {
    match tokio::time::timeout(limit, &mut task).await {
        Ok(Ok(())) => {
            info!("Pipeline event loop stopped");
            true
        }
        Ok(Err(e)) => {
            warn!("Pipeline task failed: {}", e);
            true
        }
        Err(_) => {
            warn!("Pipeline event loop did not stop in time, aborting it");
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Pipeline task failed: {}", e);
                }
            }
            false
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_event_loop_waits_for_finished_loop() {
        let task = tokio::spawn(async {});
        assert!(join_event_loop(task, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_join_event_loop_aborts_stuck_loop() {
        let task = tokio::spawn(std::future::pending::<()>());

        let joined = tokio::time::timeout(
            Duration::from_secs(1),
            join_event_loop(task, Duration::from_millis(20)),
        )
        .await
        .expect("shutdown should be bounded");
        assert!(!joined);
    }
}
