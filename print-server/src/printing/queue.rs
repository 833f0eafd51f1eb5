//! Print job queue
//!
//! Serializes access to the printers: one job at a time, highest priority
//! tier first, FIFO within a tier, with a cool-down between jobs so the
//! printer mechanics can settle.
//!
//! ```text
//! submit() ──► pending (tier, seq) ──► worker: probe ─► render ─► encode ─► dispatch
//!                   ▲                        │
//!                   └──── cool-down ◄────────┘
//! ```
//!
//! Every per-job failure (unreachable printer, render error, dispatch error,
//! panic) is logged and reported on the job's receipt. The worker itself
//! never stops because of a job.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use pos_printer::{DeviceProbe, DispatchAdapter, TextEncoding};
use serde::Serialize;
use tokio::sync::{Notify, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::error::{PrintError, PrintResult};
use super::renderer::{PAPER_WIDTH, TicketRenderer};
use super::types::{Job, JobId, JobOutcome};
use crate::core::Config;
use crate::core::tasks::panic_message;

/// Queue tuning
#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// Pause after each job before the next one starts
    pub cooldown: Duration,
    pub encoding: TextEncoding,
    pub paper_width: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(2000),
            encoding: TextEncoding::default(),
            paper_width: PAPER_WIDTH,
        }
    }
}

impl From<&Config> for QueueSettings {
    fn from(config: &Config) -> Self {
        Self {
            cooldown: config.cooldown(),
            encoding: config.text_encoding,
            paper_width: PAPER_WIDTH,
        }
    }
}

/// Snapshot of the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub pending: usize,
    pub is_busy: bool,
}

/// Handle returned for every accepted job
#[derive(Debug)]
pub struct JobReceipt {
    pub id: JobId,
    outcome: oneshot::Receiver<JobOutcome>,
}

impl JobReceipt {
    /// Wait for the job's single attempt to finish
    ///
    /// `None` if the queue shut down before the job ran.
    pub async fn outcome(self) -> Option<JobOutcome> {
        self.outcome.await.ok()
    }
}

struct QueuedJob {
    job: Job,
    reply: oneshot::Sender<JobOutcome>,
}

#[derive(Default)]
struct QueueState {
    /// Ordered by (tier, admission sequence)
    pending: BTreeMap<(u8, u64), QueuedJob>,
    next_seq: u64,
    is_busy: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    wake: Notify,
    probe: Arc<dyn DeviceProbe>,
    dispatcher: Arc<dyn DispatchAdapter>,
    renderer: TicketRenderer,
    settings: QueueSettings,
}

/// Priority print queue with a single worker
///
/// Cheap to clone; all clones share the same queue. Spawn [`PrintQueue::run`]
/// once as the worker.
#[derive(Clone)]
pub struct PrintQueue {
    inner: Arc<QueueInner>,
}

impl PrintQueue {
    pub fn new(
        probe: Arc<dyn DeviceProbe>,
        dispatcher: Arc<dyn DispatchAdapter>,
        settings: QueueSettings,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                wake: Notify::new(),
                probe,
                dispatcher,
                renderer: TicketRenderer::new(settings.paper_width),
                settings,
            }),
        }
    }

    /// Add a job; always accepted
    ///
    /// Wakes the worker when it is idle. While a job is in flight the new
    /// one simply waits its turn.
    pub fn submit(&self, job: Job) -> JobReceipt {
        let (reply, outcome) = oneshot::channel();
        let id = job.id;
        let tier = job.tier();

        tracing::debug!(
            job_id = %id,
            printer = %job.target_printer,
            ticket_type = %job.ticket_type,
            tier,
            enqueued_at = %job.enqueued_at,
            "Print job queued"
        );

        let idle = {
            let mut state = self.inner.state.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.pending.insert((tier, seq), QueuedJob { job, reply });
            !state.is_busy
        };

        if idle {
            self.inner.wake.notify_one();
        }

        JobReceipt { id, outcome }
    }

    pub fn status(&self) -> QueueStatus {
        let state = self.inner.state.lock();
        QueueStatus {
            pending: state.pending.len(),
            is_busy: state.is_busy,
        }
    }

    /// Pop the head job and mark the queue busy
    fn take_next(&self) -> Option<QueuedJob> {
        let mut state = self.inner.state.lock();
        let next = state.pending.pop_first().map(|(_, queued)| queued);
        state.is_busy = next.is_some();
        next
    }

    /// 运行队列工作者（阻塞直到取消）
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            cooldown_ms = self.inner.settings.cooldown.as_millis() as u64,
            encoding = ?self.inner.settings.encoding,
            "Print queue worker started"
        );

        loop {
            let Some(QueuedJob { job, reply }) = self.take_next() else {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = self.inner.wake.notified() => continue,
                }
            };

            let span = tracing::info_span!(
                "print_job",
                job_id = %job.id,
                printer = %job.target_printer,
                ticket_type = %job.ticket_type,
                tier = job.tier(),
            );
            let outcome = self.execute(&job).instrument(span.clone()).await;
            span.in_scope(|| log_outcome(&outcome));
            // Receiver may have been dropped by the caller
            let _ = reply.send(outcome);

            let cancelled = tokio::select! {
                _ = shutdown.cancelled() => true,
                _ = tokio::time::sleep(self.inner.settings.cooldown) => false,
            };
            self.inner.state.lock().is_busy = false;
            if cancelled {
                break;
            }
        }

        let dropped = {
            let mut state = self.inner.state.lock();
            state.is_busy = false;
            std::mem::take(&mut state.pending).len()
        };
        if dropped > 0 {
            tracing::warn!(dropped, "Print queue stopped, pending jobs discarded");
        }
        tracing::info!("Print queue worker stopped");
    }

    /// One attempt: probe, render, encode, dispatch
    async fn execute(&self, job: &Job) -> JobOutcome {
        let printer = job.target_printer.as_str();

        let reachable = self.inner.probe.is_reachable(printer);
        match AssertUnwindSafe(reachable).catch_unwind().await {
            Ok(true) => {}
            Ok(false) => {
                return JobOutcome::Failed(PrintError::PrinterUnavailable(printer.to_string()));
            }
            Err(panic_info) => {
                tracing::error!(
                    printer = %printer,
                    panic = %panic_message(panic_info.as_ref()),
                    "Printer reachability check panicked"
                );
                return JobOutcome::Failed(PrintError::PrinterUnavailable(printer.to_string()));
            }
        }

        let bytes = match self.render(job) {
            Ok(bytes) => bytes,
            Err(e) => return JobOutcome::Failed(e),
        };

        let dispatch = self.inner.dispatcher.dispatch(printer, &bytes);
        match AssertUnwindSafe(dispatch).catch_unwind().await {
            Ok(Ok(())) => JobOutcome::Printed,
            Ok(Err(e)) => JobOutcome::Failed(PrintError::DispatchFailure {
                printer: printer.to_string(),
                message: e.to_string(),
            }),
            Err(panic_info) => JobOutcome::Failed(PrintError::DispatchFailure {
                printer: printer.to_string(),
                message: format!("panic: {}", panic_message(panic_info.as_ref())),
            }),
        }
    }

    /// Render and encode, containing panics
    fn render(&self, job: &Job) -> PrintResult<Vec<u8>> {
        let renderer = &self.inner.renderer;
        let encoding = self.inner.settings.encoding;

        let rendered = std::panic::catch_unwind(AssertUnwindSafe(|| {
            renderer
                .render(job.ticket_type, &job.payload, &job.translations)
                .map(|doc| doc.encode(encoding))
        }));

        match rendered {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(e.into()),
            Err(panic_info) => Err(PrintError::RenderFailure(format!(
                "panic: {}",
                panic_message(panic_info.as_ref())
            ))),
        }
    }
}

fn log_outcome(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Printed => tracing::info!("Print job completed"),
        JobOutcome::Failed(e @ PrintError::PrinterUnavailable(_)) => {
            tracing::warn!(error = %e, "Print job dropped")
        }
        JobOutcome::Failed(e) => tracing::error!(error = %e, "Print job failed"),
    }
}
