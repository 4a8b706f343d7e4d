// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Tillprint print service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::receipt::{ReceiptDocument, ReceiptType};

/// Unique identifier for a queued print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Printers
// ---------------------------------------------------------------------------

/// Availability of a printer as reported by the spooler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterStatus {
    Online,
    Offline,
    Error,
}

impl PrinterStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Error => "error",
        })
    }
}

/// A printer known to the spooler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub status: PrinterStatus,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrinterInfo {
    pub fn new(name: impl Into<String>, status: PrinterStatus) -> Self {
        Self {
            name: name.into(),
            status,
            is_default: false,
            model: None,
            location: None,
            description: None,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }
}

/// Spooler-assigned handle for a submitted job (CUPS request id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(pub String);

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// A receipt waiting in the retry queue for its printer to come back.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub id: JobId,
    pub document: ReceiptDocument,
    pub receipt_type: ReceiptType,
    /// Printer name the caller asked for, if any.
    pub requested_printer: Option<String>,
    /// Printer chosen when the job was queued.
    pub target_printer: String,
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedJob {
    pub fn new(
        document: ReceiptDocument,
        receipt_type: ReceiptType,
        requested_printer: Option<String>,
        target_printer: String,
    ) -> Self {
        Self {
            id: JobId::new(),
            document,
            receipt_type,
            requested_printer,
            target_printer,
            enqueued_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> QueuedJobSummary {
        QueuedJobSummary {
            id: self.id,
            receipt_type: self.receipt_type.to_string(),
            reference: self.document.reference().to_string(),
            requested_printer: self.requested_printer.clone(),
            printer_name: self.target_printer.clone(),
            enqueued_at: self.enqueued_at,
        }
    }
}

/// What happened to a print request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Handed to the spooler.
    Printed {
        printer_name: String,
        timestamp: DateTime<Utc>,
        handle: JobHandle,
    },
    /// Held for retry; `position` is 1-based.
    Queued {
        job_id: JobId,
        position: usize,
        printer_name: String,
    },
}

impl PrintOutcome {
    pub fn printer_name(&self) -> &str {
        match self {
            Self::Printed { printer_name, .. } | Self::Queued { printer_name, .. } => printer_name,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Self::Queued { .. })
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// One entry in the status view of the retry queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedJobSummary {
    pub id: JobId,
    pub receipt_type: String,
    pub reference: String,
    /// Printer name as sent by the caller; `None` means "use the default".
    pub requested_printer: Option<String>,
    /// Printer the job will be sent to.
    pub printer_name: String,
    pub enqueued_at: DateTime<Utc>,
}

/// Snapshot returned by the status operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: i64,
    pub printers: Vec<PrinterInfo>,
    pub printers_online: usize,
    pub queue_length: usize,
    pub queue_capacity: usize,
    pub draining: bool,
    pub last_print: Option<DateTime<Utc>>,
    pub queued_jobs: Vec<QueuedJobSummary>,
}
