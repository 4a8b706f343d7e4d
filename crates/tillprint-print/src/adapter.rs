// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spooler adapter: a cached, refreshable view of the spooler's printers.
//
// The manager never talks to a `Spooler` directly.  It asks the adapter for
// a fresh snapshot before each print decision, and the monitor asks for one
// on a fixed interval.  Refreshes are serialised so two callers never run
// `lpstat` at the same time; readers of the cached snapshot never wait on a
// refresh in progress.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{Span, debug, info, instrument, warn};

use tillprint_core::error::Result;
use tillprint_core::types::{JobHandle, PrinterInfo};

use crate::spooler::Spooler;

/// The last printer listing and when it was taken.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterSnapshot {
    pub printers: Vec<PrinterInfo>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Result of one refresh.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub printers: Vec<PrinterInfo>,
    /// Printers that were known but not online before, and are online now.
    pub recovered: Vec<String>,
}

pub struct SpoolerAdapter {
    spooler: Arc<dyn Spooler>,
    snapshot: RwLock<PrinterSnapshot>,
    refresh_lock: Mutex<()>,
    span: Span,
}

impl SpoolerAdapter {
    /// Wrap `spooler`; all adapter work is recorded under `span`.
    pub fn new(spooler: Arc<dyn Spooler>, span: Span) -> Self {
        Self {
            spooler,
            snapshot: RwLock::new(PrinterSnapshot::default()),
            refresh_lock: Mutex::new(()),
            span,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.spooler.backend()
    }

    /// Verify the spooler is reachable and take the first snapshot.
    #[instrument(parent = &self.span, skip(self), fields(backend = self.spooler.backend()))]
    pub async fn initialize(&self) -> Result<()> {
        self.spooler.initialize().await?;
        let report = self.refresh().await?;
        info!(printers = report.printers.len(), "spooler ready");
        Ok(())
    }

    /// List printers now and replace the cached snapshot.
    ///
    /// On failure the previous snapshot is kept.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let _serial = self.refresh_lock.lock().await;

        let printers = match self.spooler.list_printers().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "printer listing failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let mut snapshot = self.snapshot.write().await;
        let recovered = recovered_printers(&snapshot, &printers);
        for previous in &snapshot.printers {
            if let Some(now) = printers.iter().find(|p| p.name == previous.name) {
                if now.status != previous.status {
                    info!(
                        printer = %now.name,
                        from = %previous.status,
                        to = %now.status,
                        "printer status changed"
                    );
                }
            }
        }

        snapshot.printers = printers.clone();
        snapshot.refreshed_at = Some(Utc::now());
        debug!(count = printers.len(), recovered = recovered.len(), "printer snapshot refreshed");

        Ok(RefreshReport {
            printers,
            recovered,
        })
    }

    /// The cached snapshot, without touching the spooler.
    pub async fn cached(&self) -> PrinterSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Hand `data` to the spooler for `printer`.
    #[instrument(parent = &self.span, skip(self, data), fields(printer = %printer, bytes = data.len()))]
    pub async fn submit(&self, data: &[u8], printer: &str, title: &str) -> Result<JobHandle> {
        self.spooler.submit(data, printer, title).await
    }
}

fn recovered_printers(previous: &PrinterSnapshot, current: &[PrinterInfo]) -> Vec<String> {
    if previous.refreshed_at.is_none() {
        return Vec::new();
    }
    let was_down: HashSet<&str> = previous
        .printers
        .iter()
        .filter(|p| !p.is_online())
        .map(|p| p.name.as_str())
        .collect();

    current
        .iter()
        .filter(|p| p.is_online() && was_down.contains(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySpooler;
    use tillprint_core::TillprintError;
    use tillprint_core::types::PrinterStatus;

    fn adapter_with(spooler: Arc<MemorySpooler>) -> SpoolerAdapter {
        SpoolerAdapter::new(spooler, Span::none())
    }

    #[tokio::test]
    async fn first_refresh_reports_no_recoveries() {
        let spooler = Arc::new(MemorySpooler::demo());
        let adapter = adapter_with(spooler);
        let report = adapter.refresh().await.unwrap();
        assert_eq!(report.printers.len(), 1);
        assert!(report.recovered.is_empty());
        assert!(adapter.cached().await.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn offline_to_online_is_a_recovery() {
        let spooler = Arc::new(MemorySpooler::with_printers(vec![
            PrinterInfo::new("Rongta", PrinterStatus::Offline),
            PrinterInfo::new("Kitchen", PrinterStatus::Online),
        ]));
        let adapter = adapter_with(spooler.clone());
        adapter.refresh().await.unwrap();

        spooler.set_status("Rongta", PrinterStatus::Online);
        let report = adapter.refresh().await.unwrap();
        assert_eq!(report.recovered, vec!["Rongta".to_string()]);

        let report = adapter.refresh().await.unwrap();
        assert!(report.recovered.is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let spooler = Arc::new(MemorySpooler::demo());
        let adapter = adapter_with(spooler.clone());
        adapter.refresh().await.unwrap();

        spooler.fail_listing(Some("lpstat crashed".into()));
        let err = adapter.refresh().await.unwrap_err();
        assert!(matches!(err, TillprintError::Spooler(_)));
        assert_eq!(adapter.cached().await.printers.len(), 1);
    }

    #[tokio::test]
    async fn cached_is_empty_before_first_refresh() {
        let adapter = adapter_with(Arc::new(MemorySpooler::demo()));
        let snapshot = adapter.cached().await;
        assert!(snapshot.printers.is_empty());
        assert!(snapshot.refreshed_at.is_none());
    }
}
