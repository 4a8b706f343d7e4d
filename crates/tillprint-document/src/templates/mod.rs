// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt layouts, one module per receipt family.

mod cash_expense;
mod cash_transfer;
mod sales;
mod shift;

use chrono::{DateTime, Utc};
use tillprint_core::ReceiptDocument;
use tillprint_core::config::ReceiptLayout;

use crate::builder::EscPosBuilder;
use crate::ops::Op;

/// Lay out `document` as a list of printer operations.
pub(crate) fn layout_document(document: &ReceiptDocument, layout: &ReceiptLayout) -> Vec<Op> {
    let mut b = EscPosBuilder::new(layout.paper_width);
    match document {
        ReceiptDocument::Sales(r) => sales::render(&mut b, r, layout),
        ReceiptDocument::CashTransfer(r) => cash_transfer::render(&mut b, r, layout),
        ReceiptDocument::ShiftClosure(r) => shift::render_closure(&mut b, r, layout),
        ReceiptDocument::ShiftHandoff(r) => shift::render_handoff(&mut b, r, layout),
        ReceiptDocument::CashExpense(r) => cash_expense::render(&mut b, r, layout),
    }
    b.finish()
}

// ---------------------------------------------------------------------------
// Shared sections
// ---------------------------------------------------------------------------

/// Business name, configured header lines, optional document title.
fn header(b: &mut EscPosBuilder, layout: &ReceiptLayout, title: Option<&str>) {
    b.center().bold().double_size().line(&layout.business_name);
    b.reset_size().bold_off();
    for line in &layout.header_lines {
        b.line(line);
    }
    if let Some(title) = title {
        b.newline().bold().line(title).bold_off();
    }
    b.left().sep_double();
}

/// Configured footer lines, then feed and (optionally) cut.
fn footer(b: &mut EscPosBuilder, layout: &ReceiptLayout) {
    b.sep_double();
    if !layout.footer_lines.is_empty() {
        b.center();
        for line in &layout.footer_lines {
            b.line(line);
        }
        b.left();
    }
    if layout.cut {
        b.cut(layout.feed_lines);
    } else {
        b.feed(layout.feed_lines);
    }
}

/// Optional free-text block such as notes or a reason.
fn note(b: &mut EscPosBuilder, label: &str, text: Option<&str>) {
    if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
        b.sep_single();
        b.line(&format!("{label}:"));
        b.paragraph(text, 2);
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `-$2.60`, `$11.65`.  Rounds to cents; never prints negative zero.
pub(crate) fn money(amount: f64, symbol: &str) -> String {
    let cents = (amount * 100.0).round();
    if cents < 0.0 {
        format!("-{symbol}{:.2}", -cents / 100.0)
    } else {
        format!("{symbol}{:.2}", cents.abs() / 100.0)
    }
}

/// `2`, `1.5`, `0.125`.
pub(crate) fn quantity(q: f64) -> String {
    if q.fract() == 0.0 && q.abs() < 1e15 {
        format!("{q:.0}")
    } else {
        let s = format!("{q:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub(crate) fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting() {
        assert_eq!(money(11.65, "$"), "$11.65");
        assert_eq!(money(-2.6, "$"), "-$2.60");
        assert_eq!(money(-0.001, "$"), "$0.00");
        assert_eq!(money(1234.5, "£"), "£1234.50");
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(quantity(2.0), "2");
        assert_eq!(quantity(1.5), "1.5");
        assert_eq!(quantity(0.125), "0.125");
    }

    #[test]
    fn timestamp_formatting() {
        let dt = DateTime::parse_from_rfc3339("2026-03-14T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp(&dt), "2026-03-14 09:30 UTC");
    }
}
