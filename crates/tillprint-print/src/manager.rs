// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print job lifecycle manager.
//
// Decides, for every print request, which printer to use and whether to
// print now or hold the receipt in the retry queue.  Queued receipts are
// re-attempted by drain passes, which run after every successful print and
// on each periodic printer refresh.  At most one drain pass runs at a time.
//
// Job states:
//
//   Enqueued -> (drain attempt) -> Printed        removed from queue
//                               -> still offline  left at front, pass stops
//                               -> Dropped        removed, error logged

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{Instrument, Span, debug, error, info, instrument, warn};

use tillprint_core::error::{Result, TillprintError};
use tillprint_core::receipt::{ReceiptDocument, ReceiptType};
use tillprint_core::types::{JobHandle, PrintOutcome, PrinterInfo, QueuedJob, ServiceStatus};
use tillprint_document::{ReceiptRenderer, RenderedReceipt};

use crate::adapter::{PrinterSnapshot, RefreshReport, SpoolerAdapter};
use crate::queue::JobQueue;

/// What a drain pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Another pass was already running; nothing was attempted.
    pub skipped: bool,
    pub printed: usize,
    pub dropped: usize,
    /// Jobs still queued when the pass ended.
    pub remaining: usize,
}

#[derive(Debug)]
struct ManagerState {
    queue: JobQueue,
    last_print: Option<DateTime<Utc>>,
}

struct Inner {
    adapter: Arc<SpoolerAdapter>,
    renderer: Arc<dyn ReceiptRenderer>,
    state: Mutex<ManagerState>,
    draining: AtomicBool,
    started_at: DateTime<Utc>,
    span: Span,
}

/// Owns the retry queue and applies the print-now or queue policy.
///
/// Cheap to clone; clones share one queue.
#[derive(Clone)]
pub struct JobManager {
    inner: Arc<Inner>,
}

/// Clears the draining flag when a pass ends, however it ends.
struct DrainGuard {
    inner: Arc<Inner>,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.inner.draining.store(false, Ordering::Release);
    }
}

impl JobManager {
    /// Build a manager whose work is recorded under `span`.
    pub fn new(
        adapter: Arc<SpoolerAdapter>,
        renderer: Arc<dyn ReceiptRenderer>,
        capacity: usize,
        span: Span,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                adapter,
                renderer,
                state: Mutex::new(ManagerState {
                    queue: JobQueue::new(capacity),
                    last_print: None,
                }),
                draining: AtomicBool::new(false),
                started_at: Utc::now(),
                span,
            }),
        }
    }

    pub fn adapter(&self) -> &SpoolerAdapter {
        &self.inner.adapter
    }

    // -----------------------------------------------------------------------
    // Print
    // -----------------------------------------------------------------------

    /// Print `document` now if its printer is online, otherwise queue it.
    #[instrument(
        parent = &self.inner.span,
        skip(self, document),
        fields(reference = document.reference(), receipt_type = %receipt_type)
    )]
    pub async fn submit_print(
        &self,
        document: ReceiptDocument,
        receipt_type: ReceiptType,
        requested_printer: Option<String>,
    ) -> Result<PrintOutcome> {
        let report = self.inner.adapter.refresh().await?;
        let target = select_printer(&report.printers, requested_printer.as_deref())?.clone();

        if !target.is_online() {
            let job = QueuedJob::new(document, receipt_type, requested_printer, target.name.clone());
            let job_id = job.id;
            let position = {
                let mut state = self.inner.state.lock().await;
                state.queue.push(job)?
            };
            info!(
                printer = %target.name,
                status = %target.status,
                job_id = %job_id,
                position,
                "printer not online, receipt queued"
            );
            return Ok(PrintOutcome::Queued {
                job_id,
                position,
                printer_name: target.name,
            });
        }

        let handle = self.dispatch(&document, &receipt_type, &target.name).await?;
        let timestamp = Utc::now();
        self.inner.state.lock().await.last_print = Some(timestamp);
        info!(printer = %target.name, handle = %handle, "receipt printed");

        self.trigger_drain();

        Ok(PrintOutcome::Printed {
            printer_name: target.name,
            timestamp,
            handle,
        })
    }

    /// Render without selecting a printer, queueing, or submitting.
    pub fn preview_print(
        &self,
        document: &ReceiptDocument,
        receipt_type: &ReceiptType,
    ) -> RenderedReceipt {
        self.inner.renderer.render(document, receipt_type)
    }

    async fn dispatch(
        &self,
        document: &ReceiptDocument,
        receipt_type: &ReceiptType,
        printer: &str,
    ) -> Result<JobHandle> {
        let rendered = self.inner.renderer.render(document, receipt_type);
        self.inner
            .adapter
            .submit(&rendered.bytes, printer, &rendered.title)
            .await
            .inspect_err(|e| {
                error!(
                    printer = %printer,
                    reference = document.reference(),
                    error = %e,
                    "print submission failed"
                );
            })
    }

    // -----------------------------------------------------------------------
    // Drain
    // -----------------------------------------------------------------------

    /// Start a drain pass in the background unless one is running.
    ///
    /// Returns whether a pass was started.
    pub fn trigger_drain(&self) -> bool {
        let Some(guard) = self.try_begin_drain() else {
            debug!(parent: &self.inner.span, "drain already running");
            return false;
        };
        let this = self.clone();
        let span = self.inner.span.clone();
        tokio::spawn(async move { this.run_drain(guard).await }.instrument(span));
        true
    }

    /// Run a drain pass to completion on the calling task.
    pub async fn drain(&self) -> DrainReport {
        match self.try_begin_drain() {
            Some(guard) => self.run_drain(guard).instrument(self.inner.span.clone()).await,
            None => DrainReport {
                skipped: true,
                remaining: self.queue_len().await,
                ..DrainReport::default()
            },
        }
    }

    fn try_begin_drain(&self) -> Option<DrainGuard> {
        self.inner
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard {
                inner: Arc::clone(&self.inner),
            })
    }

    async fn run_drain(&self, _guard: DrainGuard) -> DrainReport {
        let mut report = DrainReport::default();

        loop {
            let Some(job) = self.inner.state.lock().await.queue.front().cloned() else {
                break;
            };

            let printers = match self.inner.adapter.refresh().await {
                Ok(RefreshReport { printers, .. }) => printers,
                Err(e) => {
                    warn!(error = %e, "cannot list printers, drain pass stopped");
                    break;
                }
            };

            let target = match select_printer(&printers, job.requested_printer.as_deref()) {
                Ok(p) => p.clone(),
                Err(TillprintError::PrinterNotFound(name)) => {
                    warn!(job_id = %job.id, printer = %name, "printer no longer exists, queued receipt dropped");
                    self.remove_job(&job).await;
                    report.dropped += 1;
                    continue;
                }
                Err(e) => {
                    debug!(job_id = %job.id, error = %e, "no printer for queued receipt, drain pass stopped");
                    break;
                }
            };

            if !target.is_online() {
                debug!(job_id = %job.id, printer = %target.name, "printer still not online, drain pass stopped");
                break;
            }

            match self.dispatch(&job.document, &job.receipt_type, &target.name).await {
                Ok(handle) => {
                    let queue_len = {
                        let mut state = self.inner.state.lock().await;
                        state.queue.remove(&job.id);
                        state.last_print = Some(Utc::now());
                        state.queue.len()
                    };
                    info!(job_id = %job.id, printer = %target.name, handle = %handle, queue_len, "queued receipt printed");
                    report.printed += 1;
                }
                Err(e) => {
                    // Dropped after one failure; no second attempt.
                    error!(
                        job_id = %job.id,
                        printer = %target.name,
                        reference = job.document.reference(),
                        error = %e,
                        "queued receipt dropped"
                    );
                    self.remove_job(&job).await;
                    report.dropped += 1;
                }
            }
        }

        report.remaining = self.queue_len().await;
        if report.printed > 0 || report.dropped > 0 {
            info!(
                printed = report.printed,
                dropped = report.dropped,
                remaining = report.remaining,
                "drain pass finished"
            );
        }
        report
    }

    async fn remove_job(&self, job: &QueuedJob) {
        self.inner.state.lock().await.queue.remove(&job.id);
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// Refresh the printer snapshot (used by the periodic monitor).
    pub async fn refresh_printers(&self) -> Result<RefreshReport> {
        self.inner.adapter.refresh().await
    }

    pub async fn printers(&self) -> PrinterSnapshot {
        self.inner.adapter.cached().await
    }

    pub async fn queue_len(&self) -> usize {
        self.inner.state.lock().await.queue.len()
    }

    /// Whether a drain pass over `printers` would act on the front job.
    ///
    /// True when its printer is online, or when its requested printer is
    /// gone and the pass would drop it.  False on an empty queue.
    pub async fn front_job_ready(&self, printers: &[PrinterInfo]) -> bool {
        let state = self.inner.state.lock().await;
        let Some(job) = state.queue.front() else {
            return false;
        };
        match select_printer(printers, job.requested_printer.as_deref()) {
            Ok(target) => target.is_online(),
            Err(TillprintError::PrinterNotFound(_)) => true,
            Err(_) => false,
        }
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Acquire)
    }

    /// Current service state.  Reads the cached snapshot; never calls the
    /// spooler.
    pub async fn status(&self) -> ServiceStatus {
        let snapshot = self.inner.adapter.cached().await;
        let state = self.inner.state.lock().await;
        let now = Utc::now();

        ServiceStatus {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            started_at: self.inner.started_at,
            uptime_secs: (now - self.inner.started_at).num_seconds(),
            printers_online: snapshot.printers.iter().filter(|p| p.is_online()).count(),
            printers: snapshot.printers,
            queue_length: state.queue.len(),
            queue_capacity: state.queue.capacity(),
            draining: self.is_draining(),
            last_print: state.last_print,
            queued_jobs: state.queue.summaries(),
        }
    }
}

/// Pick the target printer from a snapshot.
///
/// A requested name must match exactly.  Otherwise the default printer,
/// otherwise the first listed.
pub fn select_printer<'a>(
    printers: &'a [PrinterInfo],
    requested: Option<&str>,
) -> Result<&'a PrinterInfo> {
    if printers.is_empty() {
        return Err(TillprintError::NoPrintersAvailable);
    }
    match requested {
        Some(name) => printers
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| TillprintError::PrinterNotFound(name.to_string())),
        None => Ok(printers
            .iter()
            .find(|p| p.is_default)
            .unwrap_or(&printers[0])),
    }
}
