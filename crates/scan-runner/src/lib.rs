//! Compliance Scan Runner
//!
//! Loads center and inspection exports, runs the batch scanner against a
//! notification store, and persists the store between passes.

mod args;

pub use args::RunnerArgs;

use alerting::NotificationDeduplicator;
use anyhow::Context;
use inspection_model::{CenterRecord, InspectionRecord, NotificationDraft};
use notification_store::{NotificationSink, NotificationStore};
use scanner::{BatchScanner, ScanConfig, ScanReport};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Runner error types
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to install logging: {0}")]
    Logging(String),
}

/// Initialize logging
pub fn init_logging(level: Level, json: bool) -> Result<(), RunnerError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| RunnerError::Logging(e.to_string()))
}

/// Read a JSON array of records
pub fn load_records<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Hand a draft to the sink, forgetting its dedup key if the sink fails
/// so that a later pass retries it
pub fn emit_or_forget<S: NotificationSink>(
    sink: &S,
    dedup: &NotificationDeduplicator,
    draft: NotificationDraft,
) {
    let (inspection_id, kind) = (draft.inspection_id.clone(), draft.kind);
    if let Err(e) = sink.emit(draft) {
        error!("Failed to store {} notification for {}: {}", kind, inspection_id, e);
        dedup.forget(&inspection_id, kind);
    }
}

/// Scan runner state kept across passes
pub struct Runner {
    args: RunnerArgs,
    scanner: BatchScanner,
    store: NotificationStore,
}

impl Runner {
    /// Load configuration and the notification snapshot
    pub fn new(args: RunnerArgs) -> anyhow::Result<Self> {
        let config = ScanConfig::load(args.config.as_deref()).context("loading scan config")?;

        let store = match &args.store {
            Some(path) => NotificationStore::load(path)
                .with_context(|| format!("loading notifications from {}", path.display()))?,
            None => NotificationStore::new(),
        };

        let dedup = NotificationDeduplicator::seeded(&store.snapshot()?);
        let scanner = BatchScanner::new(config, Arc::new(dedup));

        Ok(Self {
            args,
            scanner,
            store,
        })
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn scanner(&self) -> &BatchScanner {
        &self.scanner
    }

    /// Run one scan over the current contents of the input files
    pub async fn run_pass(&self) -> anyhow::Result<ScanReport> {
        let centers: Vec<CenterRecord> = load_records(&self.args.centers)?;
        let inspections: Vec<InspectionRecord> = load_records(&self.args.inspections)?;
        let existing = self.store.snapshot()?;

        info!(
            "Scanning {} inspections against {} centers",
            inspections.len(),
            centers.len()
        );

        let dedup = self.scanner.dedup();
        let emit = |draft: NotificationDraft| emit_or_forget(&self.store, dedup, draft);

        let report = if self.args.concurrent {
            self.scanner
                .scan_concurrent(inspections, &centers, &existing, emit)
                .await?
        } else {
            self.scanner.scan(&inspections, &centers, &existing, emit)
        };

        if let Some(path) = &self.args.store {
            self.store
                .save(path)
                .with_context(|| format!("saving notifications to {}", path.display()))?;
        }

        Ok(report)
    }

    /// Run once, or on the configured interval until Ctrl-C
    pub async fn run(&self) -> anyhow::Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `signal` resolves.
    ///
    /// The signal is watched from its own task, so it cancels a pass that is
    /// already running instead of waiting for it to finish.
    pub async fn run_until<S>(&self, signal: S) -> anyhow::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.scanner.cancellation();
        let mut watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                signal.await;
                info!("Shutdown requested");
                cancel.cancel();
            }
        });

        let Some(period) = self.args.interval() else {
            let result = self.run_pass().await;
            watcher.abort();
            info!("Pass finished: {:?}", result?);
            return Ok(());
        };

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut watcher => break,
            }

            match self.run_pass().await {
                Ok(report) => info!("Pass finished: {:?}", report),
                Err(e) => warn!("Scan pass failed: {:#}", e),
            }
            if cancel.is_cancelled() {
                break;
            }
        }

        watcher.abort();
        Ok(())
    }
}
