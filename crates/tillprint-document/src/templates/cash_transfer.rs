// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cash movement between drawers, safes, and offices.

use tillprint_core::config::ReceiptLayout;
use tillprint_core::receipt::CashTransferReceipt;

use super::{footer, header, money, note, timestamp};
use crate::builder::EscPosBuilder;

pub(super) fn render(b: &mut EscPosBuilder, r: &CashTransferReceipt, layout: &ReceiptLayout) {
    header(b, layout, Some("CASH TRANSFER"));
    b.line_lr("Transfer #", &r.transfer_id);
    b.line_lr("Date", &timestamp(&r.date));
    b.line_lr("Performed by", &r.performed_by);
    b.sep_single();

    b.line_lr("From", &r.from_location);
    b.line_lr("To", &r.to_location);
    b.bold().double_height();
    b.line_lr("AMOUNT", &money(r.amount, &layout.currency_symbol));
    b.reset_size().bold_off();

    note(b, "Reason", r.reason.as_deref());

    b.signature("Released by");
    b.signature("Received by");
    footer(b, layout);
}
