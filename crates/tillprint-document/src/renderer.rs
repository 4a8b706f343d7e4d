// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The rendering contract used by the job manager.

use sha2::{Digest, Sha256};
use tillprint_core::config::ReceiptLayout;
use tillprint_core::{ReceiptDocument, ReceiptType};
use tracing::{debug, warn};

use crate::codegen;
use crate::templates;

/// Output of one render: printer bytes plus the matching text transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReceipt {
    pub bytes: Vec<u8>,
    pub transcript: String,
    /// Spooler job title, e.g. `sales R-1001`.
    pub title: String,
}

impl RenderedReceipt {
    /// Number of printed lines, blank feed lines included.
    pub fn line_count(&self) -> usize {
        self.transcript.lines().count()
    }

    /// Hex SHA-256 of the printer bytes.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// Maps a receipt document to printer bytes.
///
/// Implementations must be pure: the same document and type always give
/// the same bytes, and rendering never fails.
pub trait ReceiptRenderer: Send + Sync {
    fn render(&self, document: &ReceiptDocument, receipt_type: &ReceiptType) -> RenderedReceipt;
}

/// ESC/POS renderer for 58 mm and 80 mm thermal printers.
#[derive(Debug, Clone, Default)]
pub struct EscPosRenderer {
    layout: ReceiptLayout,
}

impl EscPosRenderer {
    pub fn new(layout: ReceiptLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ReceiptLayout {
        &self.layout
    }
}

impl ReceiptRenderer for EscPosRenderer {
    fn render(&self, document: &ReceiptDocument, receipt_type: &ReceiptType) -> RenderedReceipt {
        match receipt_type.kind() {
            None => warn!(
                receipt_type = %receipt_type,
                reference = document.reference(),
                "unknown receipt type, using sales layout"
            ),
            Some(kind) if kind != document.kind() => debug!(
                receipt_type = %receipt_type,
                document_kind = %document.kind(),
                "type tag differs from document, rendering document layout"
            ),
            Some(_) => {}
        }

        let ops = templates::layout_document(document, &self.layout);
        RenderedReceipt {
            bytes: codegen::to_bytes(&ops),
            transcript: codegen::to_transcript(&ops, self.layout.paper_width),
            title: format!("{} {}", document.kind(), document.reference()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};
    use tracing_subscriber::fmt::MakeWriter;
    use tillprint_core::ReceiptKind;
    use tillprint_core::samples::sample;

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = EscPosRenderer::default();
        for kind in ReceiptKind::ALL {
            let doc = sample(kind, fixed_now());
            let a = renderer.render(&doc, &kind.into());
            let b = renderer.render(&doc, &kind.into());
            assert_eq!(a, b);
            assert_eq!(a.checksum(), b.checksum());
        }
    }

    /// Shared buffer the fmt subscriber writes log lines into.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` under a debug-level subscriber and return what it logged.
    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (out, logs)
    }

    #[test]
    fn unknown_type_renders_like_sales() {
        let renderer = EscPosRenderer::default();
        let doc = sample(ReceiptKind::Sales, fixed_now());
        let sales = renderer.render(&doc, &ReceiptKind::Sales.into());
        let (unknown, logs) =
            capture_logs(|| renderer.render(&doc, &ReceiptType::parse("gift_card")));
        assert_eq!(sales.bytes, unknown.bytes);
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("unknown receipt type"), "logs: {logs}");
        assert!(logs.contains("gift_card"), "logs: {logs}");
    }

    #[test]
    fn known_type_renders_without_warning() {
        let renderer = EscPosRenderer::default();
        let doc = sample(ReceiptKind::Sales, fixed_now());
        let (_, logs) = capture_logs(|| renderer.render(&doc, &ReceiptKind::Sales.into()));
        assert!(!logs.contains("WARN"), "logs: {logs}");

        // A known tag that disagrees with the document is only a debug note.
        let (_, logs) =
            capture_logs(|| renderer.render(&doc, &ReceiptKind::CashExpense.into()));
        assert!(!logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("type tag differs"), "logs: {logs}");
    }

    #[test]
    fn bytes_start_with_init_and_end_with_cut() {
        let renderer = EscPosRenderer::default();
        let out = renderer.render(&sample(ReceiptKind::Sales, fixed_now()), &ReceiptType::default());
        assert_eq!(&out.bytes[..2], &[0x1B, 0x40]);
        assert_eq!(&out.bytes[out.bytes.len() - 4..], &[0x1D, 0x56, 0x42, 0x03]);
    }

    #[test]
    fn no_cut_when_disabled() {
        let layout = ReceiptLayout {
            cut: false,
            ..ReceiptLayout::default()
        };
        let renderer = EscPosRenderer::new(layout);
        let out = renderer.render(&sample(ReceiptKind::Sales, fixed_now()), &ReceiptType::default());
        assert_eq!(&out.bytes[out.bytes.len() - 3..], &[0x1B, 0x64, 0x03]);
    }

    #[test]
    fn title_names_kind_and_reference() {
        let renderer = EscPosRenderer::default();
        let out = renderer.render(
            &sample(ReceiptKind::CashExpense, fixed_now()),
            &ReceiptKind::CashExpense.into(),
        );
        assert_eq!(out.title, "cash_expense EXP-TEST-01");
    }

    #[test]
    fn checksum_is_hex_sha256() {
        let out = RenderedReceipt {
            bytes: b"abc".to_vec(),
            transcript: String::new(),
            title: String::new(),
        };
        assert_eq!(
            out.checksum(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
