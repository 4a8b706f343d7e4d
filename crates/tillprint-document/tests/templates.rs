// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transcript checks for every receipt layout.

use chrono::{TimeZone, Utc};
use serde_json::json;

use tillprint_core::config::ReceiptLayout;
use tillprint_core::samples::sample;
use tillprint_core::{ReceiptDocument, ReceiptKind, ReceiptType};
use tillprint_document::{EscPosRenderer, ReceiptRenderer};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

fn transcript(kind: ReceiptKind) -> String {
    EscPosRenderer::default()
        .render(&sample(kind, now()), &kind.into())
        .transcript
}

#[test]
fn sales_transcript_has_items_and_totals() {
    let text = transcript(ReceiptKind::Sales);
    assert!(text.contains("Tillprint"));
    assert!(text.contains("TEST-0001"));
    assert!(text.contains("2026-03-14 09:30 UTC"));
    assert!(text.contains("Espresso"));
    assert!(text.contains("  2 x $2.50"));
    assert!(text.contains("-$0.50"));
    assert!(text.contains("$11.65"));
    assert!(text.contains("CASH"));
    assert!(text.contains("$8.35"));
    assert!(text.contains("Thank you!"));
}

#[test]
fn every_line_fits_the_paper() {
    for kind in ReceiptKind::ALL {
        for line in transcript(kind).lines() {
            assert!(
                line.chars().count() <= 48,
                "{kind}: line too wide: {line:?}"
            );
        }
    }
}

#[test]
fn transfer_transcript() {
    let text = transcript(ReceiptKind::CashTransfer);
    assert!(text.contains("CASH TRANSFER"));
    assert!(text.contains("Register 1"));
    assert!(text.contains("Back Office Safe"));
    assert!(text.contains("$250.00"));
    assert!(text.contains("Drawer over limit"));
    assert!(text.contains("Received by: ___"));
}

#[test]
fn shift_closure_transcript_labels_short_variance() {
    let text = transcript(ReceiptKind::ShiftClosure);
    assert!(text.contains("SHIFT CLOSURE"));
    assert!(text.contains("Variance (short)"));
    assert!(text.contains("-$2.60"));
    assert!(text.contains("57"));
}

#[test]
fn shift_handoff_transcript() {
    let text = transcript(ReceiptKind::ShiftHandoff);
    assert!(text.contains("SHIFT HANDOFF"));
    assert!(text.contains("Relief Cashier"));
    assert!(text.contains("$300.00"));
}

#[test]
fn cash_expense_transcript() {
    let text = transcript(ReceiptKind::CashExpense);
    assert!(text.contains("CASH EXPENSE"));
    assert!(text.contains("Thermal paper rolls"));
    assert!(text.contains("INV-4471"));
    assert!(text.contains("$18.40"));
}

#[test]
fn layout_settings_are_applied() {
    let layout = ReceiptLayout {
        business_name: "Corner Cafe".into(),
        header_lines: vec!["12 Harbour St".into()],
        footer_lines: vec!["See you soon".into()],
        paper_width: 32,
        currency_symbol: "£".into(),
        ..ReceiptLayout::default()
    };
    let out = EscPosRenderer::new(layout).render(
        &sample(ReceiptKind::Sales, now()),
        &ReceiptType::default(),
    );
    assert!(out.transcript.contains("Corner Cafe"));
    assert!(out.transcript.contains("12 Harbour St"));
    assert!(out.transcript.contains("See you soon"));
    assert!(out.transcript.contains("£11.65"));
    assert!(!out.transcript.contains("Thank you!"));
    assert!(out.transcript.lines().all(|l| l.chars().count() <= 32));
}

#[test]
fn unknown_tag_from_json_prints_as_sales() {
    let value = json!({
        "receipt_number": "R-77",
        "cashier": "Ana",
        "date": "2026-03-14T09:30:00Z",
        "items": [{ "name": "Tea", "quantity": 1, "unit_price": 2.0, "total": 2.0 }],
        "subtotal": 2.0,
        "tax": 0.0,
        "total": 2.0,
        "payment_method": "card"
    });
    let ty = ReceiptType::parse("loyalty_v2");
    let doc = ReceiptDocument::from_value(&ty, value).expect("sales schema");
    let out = EscPosRenderer::default().render(&doc, &ty);
    assert!(out.transcript.contains("R-77"));
    assert!(out.transcript.contains("CARD"));
    assert!(out.line_count() > 10);
}
