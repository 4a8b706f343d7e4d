// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-of-shift reports: closure (drawer count) and handoff (drawer changes hands).

use tillprint_core::config::ReceiptLayout;
use tillprint_core::receipt::{ShiftClosureReceipt, ShiftHandoffReceipt};

use super::{footer, header, money, note, timestamp};
use crate::builder::EscPosBuilder;

pub(super) fn render_closure(b: &mut EscPosBuilder, r: &ShiftClosureReceipt, layout: &ReceiptLayout) {
    let cur = layout.currency_symbol.as_str();

    header(b, layout, Some("SHIFT CLOSURE"));
    b.line_lr("Shift #", &r.shift_id);
    b.line_lr("Cashier", &r.cashier);
    b.line_lr("Opened", &timestamp(&r.opened_at));
    b.line_lr("Closed", &timestamp(&r.closed_at));
    b.sep_single();

    b.line_lr("Transactions", &r.transaction_count.to_string());
    b.line_lr("Total sales", &money(r.total_sales, cur));
    b.sep_single();

    b.line_lr("Opening cash", &money(r.opening_cash, cur));
    b.line_lr("Expected cash", &money(r.expected_cash, cur));
    b.line_lr("Counted cash", &money(r.counted_cash, cur));
    b.bold();
    b.line_lr(variance_label(r.variance), &money(r.variance, cur));
    b.bold_off();

    note(b, "Notes", r.notes.as_deref());

    b.signature("Cashier");
    b.signature("Supervisor");
    footer(b, layout);
}

pub(super) fn render_handoff(b: &mut EscPosBuilder, r: &ShiftHandoffReceipt, layout: &ReceiptLayout) {
    header(b, layout, Some("SHIFT HANDOFF"));
    b.line_lr("Shift #", &r.shift_id);
    b.line_lr("Date", &timestamp(&r.date));
    b.sep_single();

    b.line_lr("Outgoing", &r.outgoing_cashier);
    b.line_lr("Incoming", &r.incoming_cashier);
    b.bold().double_height();
    b.line_lr("CASH", &money(r.cash_amount, &layout.currency_symbol));
    b.reset_size().bold_off();

    note(b, "Notes", r.notes.as_deref());

    b.signature("Outgoing");
    b.signature("Incoming");
    footer(b, layout);
}

fn variance_label(variance: f64) -> &'static str {
    if (variance * 100.0).round() > 0.0 {
        "Variance (over)"
    } else if (variance * 100.0).round() < 0.0 {
        "Variance (short)"
    } else {
        "Variance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_labels() {
        assert_eq!(variance_label(2.5), "Variance (over)");
        assert_eq!(variance_label(-0.01), "Variance (short)");
        assert_eq!(variance_label(0.001), "Variance");
    }
}
