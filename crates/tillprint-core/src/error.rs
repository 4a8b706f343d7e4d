// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tillprint.

use serde::Serialize;
use thiserror::Error;

/// Top-level error type for all Tillprint operations.
#[derive(Debug, Error)]
pub enum TillprintError {
    // -- Request errors --
    #[error("invalid receipt: {0}")]
    Validation(String),

    // -- Printer selection --
    #[error("no printers available")]
    NoPrintersAvailable,

    #[error("printer not found: {0}")]
    PrinterNotFound(String),

    // -- Queue --
    #[error("print queue is full ({capacity} jobs waiting)")]
    QueueFull { capacity: usize },

    // -- Spooler --
    #[error("print to {printer} failed: {reason}")]
    PrintFailed { printer: String, reason: String },

    #[error("print spooler unavailable: {0}")]
    SpoolerUnavailable(String),

    #[error("spooler query failed: {0}")]
    Spooler(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable, machine-distinguishable error codes.
///
/// These are part of the HTTP contract (`kind` field) and must not change
/// spelling between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NoPrintersAvailable,
    PrinterNotFound,
    QueueFull,
    PrintFailed,
    SpoolerUnavailable,
    Spooler,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NoPrintersAvailable => "no_printers_available",
            Self::PrinterNotFound => "printer_not_found",
            Self::QueueFull => "queue_full",
            Self::PrintFailed => "print_failed",
            Self::SpoolerUnavailable => "spooler_unavailable",
            Self::Spooler => "spooler",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TillprintError {
    /// The stable code for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NoPrintersAvailable => ErrorKind::NoPrintersAvailable,
            Self::PrinterNotFound(_) => ErrorKind::PrinterNotFound,
            Self::QueueFull { .. } => ErrorKind::QueueFull,
            Self::PrintFailed { .. } => ErrorKind::PrintFailed,
            Self::SpoolerUnavailable(_) => ErrorKind::SpoolerUnavailable,
            Self::Spooler(_) => ErrorKind::Spooler,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Convenience constructor for validation failures on a named field.
    pub fn invalid_field(field: &str, problem: impl std::fmt::Display) -> Self {
        Self::Validation(format!("{field} {problem}"))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TillprintError>;
