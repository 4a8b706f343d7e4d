// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Petty-cash expense slip.

use tillprint_core::config::ReceiptLayout;
use tillprint_core::receipt::CashExpenseReceipt;

use super::{footer, header, money, timestamp};
use crate::builder::EscPosBuilder;

pub(super) fn render(b: &mut EscPosBuilder, r: &CashExpenseReceipt, layout: &ReceiptLayout) {
    header(b, layout, Some("CASH EXPENSE"));
    b.line_lr("Expense #", &r.expense_id);
    b.line_lr("Date", &timestamp(&r.date));
    b.line_lr("Category", &r.category);
    if let Some(reference) = r.reference.as_deref().filter(|s| !s.trim().is_empty()) {
        b.line_lr("Reference", reference);
    }
    b.sep_single();

    b.paragraph(&r.description, 0);
    b.bold().double_height();
    b.line_lr("AMOUNT", &money(r.amount, &layout.currency_symbol));
    b.reset_size().bold_off();
    b.sep_single();

    b.line_lr("Authorized by", &r.authorized_by);
    b.signature("Signature");
    footer(b, layout);
}
