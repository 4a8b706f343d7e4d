// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The seam between Tillprint and the operating system's print spooler.

use async_trait::async_trait;

use tillprint_core::error::Result;
use tillprint_core::types::{JobHandle, PrinterInfo};

/// A print spooler that knows a set of named printers and accepts raw jobs.
#[async_trait]
pub trait Spooler: Send + Sync {
    /// Short backend name for logs (`cups`, `memory`).
    fn backend(&self) -> &'static str;

    /// Check the spooler is reachable.  Fails with `SpoolerUnavailable`.
    async fn initialize(&self) -> Result<()>;

    /// All printers the spooler knows, in the spooler's own order.
    async fn list_printers(&self) -> Result<Vec<PrinterInfo>>;

    /// Submit `data` unmodified to `printer`.  Fails with `PrintFailed`.
    async fn submit(&self, data: &[u8], printer: &str, title: &str) -> Result<JobHandle>;
}
