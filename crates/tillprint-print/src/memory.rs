// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory spooler for development machines without CUPS and for tests.
//
// Printers are virtual: their status is set by hand and every accepted job
// is recorded instead of printed.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use tillprint_core::error::{Result, TillprintError};
use tillprint_core::types::{JobHandle, PrinterInfo, PrinterStatus};

use crate::spooler::Spooler;

/// A job accepted by the in-memory spooler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub handle: JobHandle,
    pub printer: String,
    pub title: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryState {
    printers: Vec<PrinterInfo>,
    submitted: Vec<SubmittedJob>,
    submit_failures: VecDeque<String>,
    listing_error: Option<String>,
    submit_delay: Duration,
    next_id: u64,
    listings: usize,
}

/// Spooler whose printers live in memory.
#[derive(Debug, Default)]
pub struct MemorySpooler {
    state: Mutex<MemoryState>,
}

impl MemorySpooler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_printers(printers: Vec<PrinterInfo>) -> Self {
        let spooler = Self::new();
        spooler.lock().printers = printers;
        spooler
    }

    /// A single online default printer, for running the service without CUPS.
    pub fn demo() -> Self {
        Self::with_printers(vec![
            PrinterInfo::new("Virtual-Receipt", PrinterStatus::Online).with_default(true),
        ])
    }

    pub fn add_printer(&self, printer: PrinterInfo) {
        self.lock().printers.push(printer);
    }

    pub fn remove_printer(&self, name: &str) {
        self.lock().printers.retain(|p| p.name != name);
    }

    /// Change a printer's status.  Returns false if no printer has that name.
    pub fn set_status(&self, name: &str, status: PrinterStatus) -> bool {
        let mut state = self.lock();
        match state.printers.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.status = status;
                true
            }
            None => false,
        }
    }

    /// Make the next submission fail with `reason`.  Calls stack up.
    pub fn fail_next_submit(&self, reason: impl Into<String>) {
        self.lock().submit_failures.push_back(reason.into());
    }

    /// Make every listing fail until cleared with `None`.
    pub fn fail_listing(&self, reason: Option<String>) {
        self.lock().listing_error = reason;
    }

    /// Delay each submission, to hold a drain pass open in tests.
    pub fn set_submit_delay(&self, delay: Duration) {
        self.lock().submit_delay = delay;
    }

    pub fn submitted(&self) -> Vec<SubmittedJob> {
        self.lock().submitted.clone()
    }

    /// Number of `list_printers` calls so far, failed ones included.
    pub fn listings(&self) -> usize {
        self.lock().listings
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding this lock can only come from a test; keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Spooler for MemorySpooler {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn initialize(&self) -> Result<()> {
        info!(printers = self.lock().printers.len(), "using in-memory spooler");
        Ok(())
    }

    async fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        let mut state = self.lock();
        state.listings += 1;
        if let Some(reason) = &state.listing_error {
            return Err(TillprintError::Spooler(reason.clone()));
        }
        Ok(state.printers.clone())
    }

    async fn submit(&self, data: &[u8], printer: &str, title: &str) -> Result<JobHandle> {
        let delay = self.lock().submit_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(reason) = state.submit_failures.pop_front() {
            warn!(printer = %printer, reason = %reason, "simulated submission failure");
            return Err(TillprintError::PrintFailed {
                printer: printer.to_string(),
                reason,
            });
        }
        if !state.printers.iter().any(|p| p.name == printer) {
            return Err(TillprintError::PrintFailed {
                printer: printer.to_string(),
                reason: format!("unknown destination \"{printer}\""),
            });
        }

        state.next_id += 1;
        let handle = JobHandle(format!("{printer}-{}", state.next_id));
        state.submitted.push(SubmittedJob {
            handle: handle.clone(),
            printer: printer.to_string(),
            title: title.to_string(),
            data: data.to_vec(),
        });
        debug!(printer = %printer, handle = %handle, bytes = data.len(), "job recorded");
        Ok(handle)
    }
}
