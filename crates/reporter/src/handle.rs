//! ReporterHandle - bounded queue drained by a fixed worker pool

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_channel::{Receiver, Sender, TrySendError};
use contracts::{CorrelatedRecord, RecordSubmitter, ReportPayload, ReportTransport};
use observability::ReportOutcome;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, trace, warn};

use crate::metrics::{ReporterMetrics, ReporterSnapshot};

/// Dead letters kept before the oldest are discarded
const DEAD_LETTER_CAPACITY: usize = 1024;

/// A payload that never reached the collector
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub payload: ReportPayload,
    pub reason: String,
}

/// Reporter sizing
#[derive(Debug, Clone)]
pub struct ReporterOptions {
    pub queue_capacity: usize,
    pub workers: usize,
    /// Identifier of this scanning device, sent with every payload
    pub local_device_id: String,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            workers: 4,
            local_device_id: "unknown-device".to_string(),
        }
    }
}

impl From<&contracts::ReporterConfig> for ReporterOptions {
    fn from(config: &contracts::ReporterConfig) -> Self {
        Self {
            queue_capacity: config.queue_capacity,
            workers: config.workers,
            local_device_id: config.local_device_id.clone(),
        }
    }
}

/// Handle to a running reporter
///
/// `submit` never blocks: a full queue drops the payload. Must be created
/// inside a tokio runtime; `submit` may be called from any thread.
pub struct ReporterHandle {
    transport_name: String,
    local_device_id: String,
    tx: Sender<ReportPayload>,
    dead_tx: Sender<DeadLetter>,
    dead_rx: Receiver<DeadLetter>,
    metrics: Arc<ReporterMetrics>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ReporterHandle {
    pub fn spawn<T>(transport: T, options: ReporterOptions) -> Self
    where
        T: ReportTransport + Sync + 'static,
    {
        let transport_name = transport.name().to_string();
        let (tx, rx) = async_channel::bounded(options.queue_capacity.max(1));
        let (dead_tx, dead_rx) = async_channel::bounded(DEAD_LETTER_CAPACITY);
        let metrics = Arc::new(ReporterMetrics::new());
        let transport = Arc::new(transport);

        let workers = (0..options.workers.max(1))
            .map(|worker_id| {
                tokio::spawn(report_worker(
                    worker_id,
                    Arc::clone(&transport),
                    rx.clone(),
                    dead_tx.clone(),
                    dead_rx.clone(),
                    Arc::clone(&metrics),
                ))
            })
            .collect();

        debug!(
            transport = %transport_name,
            queue_capacity = options.queue_capacity,
            workers = options.workers,
            "Reporter started"
        );

        Self {
            transport_name,
            local_device_id: options.local_device_id,
            tx,
            dead_tx,
            dead_rx,
            metrics,
            workers: Mutex::new(workers),
        }
    }

    pub fn transport_name(&self) -> &str {
        &self.transport_name
    }

    pub fn metrics(&self) -> ReporterSnapshot {
        self.metrics.snapshot()
    }

    /// Queue one payload
    ///
    /// Returns false if it was dropped (queue full or reporter shut down).
    pub fn try_submit(&self, payload: ReportPayload) -> bool {
        match self.tx.try_send(payload) {
            Ok(()) => {
                self.metrics.inc_enqueued();
                self.metrics.set_queue_len(self.tx.len());
                trace!(transport = %self.transport_name, "Payload queued");
                true
            }
            Err(TrySendError::Full(payload)) => {
                warn!(
                    transport = %self.transport_name,
                    mac_address = %payload.mac_address,
                    "Report queue full, payload dropped"
                );
                self.drop_payload(payload, "queue full");
                false
            }
            Err(TrySendError::Closed(payload)) => {
                warn!(transport = %self.transport_name, "Reporter shut down, payload dropped");
                self.drop_payload(payload, "reporter closed");
                false
            }
        }
    }

    fn drop_payload(&self, payload: ReportPayload, reason: &str) {
        self.metrics.inc_dropped();
        observability::record_report_outcome(&self.transport_name, ReportOutcome::Dropped);
        push_dead_letter(
            &self.dead_tx,
            &self.dead_rx,
            DeadLetter {
                payload,
                reason: reason.to_string(),
            },
        );
    }

    /// Receiver for failed and dropped payloads
    pub fn dead_letters(&self) -> Receiver<DeadLetter> {
        self.dead_rx.clone()
    }

    /// Take every dead letter currently held
    pub fn drain_dead_letters(&self) -> Vec<DeadLetter> {
        std::iter::from_fn(|| self.dead_rx.try_recv().ok()).collect()
    }

    /// Stop accepting payloads, deliver what is queued, join the workers
    #[instrument(name = "reporter_shutdown", skip(self), fields(transport = %self.transport_name))]
    pub async fn shutdown(&self) -> ReporterSnapshot {
        // Receivers still see queued payloads after close
        self.tx.close();

        let workers = match self.workers.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = ?e, "Reporter worker panicked");
            }
        }

        let snapshot = self.metrics.snapshot();
        debug!(
            delivered = snapshot.delivered,
            failed = snapshot.failed,
            dropped = snapshot.dropped,
            "Reporter shutdown complete"
        );
        snapshot
    }
}

impl RecordSubmitter for ReporterHandle {
    fn submit(&self, record: &CorrelatedRecord) {
        self.try_submit(ReportPayload::from_record(record, &self.local_device_id));
    }
}

/// Bounded dead-letter push; evicts the oldest letter when full
fn push_dead_letter(tx: &Sender<DeadLetter>, rx: &Receiver<DeadLetter>, letter: DeadLetter) {
    let mut letter = letter;
    loop {
        match tx.try_send(letter) {
            Ok(()) => return,
            Err(TrySendError::Full(back)) => {
                let _ = rx.try_recv();
                letter = back;
            }
            Err(TrySendError::Closed(_)) => return,
        }
    }
}

#[instrument(
    name = "report_worker_loop",
    skip(transport, rx, dead_tx, dead_rx, metrics),
    fields(transport = %transport.name())
)]
async fn report_worker<T: ReportTransport>(
    worker_id: usize,
    transport: Arc<T>,
    rx: Receiver<ReportPayload>,
    dead_tx: Sender<DeadLetter>,
    dead_rx: Receiver<DeadLetter>,
    metrics: Arc<ReporterMetrics>,
) {
    debug!(worker_id, "Report worker started");

    while let Ok(payload) = rx.recv().await {
        metrics.set_queue_len(rx.len());
        let started = Instant::now();

        match transport.deliver(&payload).await {
            Ok(()) => {
                metrics.inc_delivered();
                observability::record_report_outcome(transport.name(), ReportOutcome::Delivered);
                observability::record_report_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
            }
            Err(e) => {
                metrics.inc_failed();
                observability::record_report_outcome(transport.name(), ReportOutcome::Failed);
                warn!(
                    worker_id,
                    mac_address = %payload.mac_address,
                    error = %e,
                    "Report delivery failed"
                );
                push_dead_letter(
                    &dead_tx,
                    &dead_rx,
                    DeadLetter {
                        payload,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    debug!(worker_id, "Report worker stopped");
}
