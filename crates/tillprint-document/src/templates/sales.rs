// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Customer sales receipt.

use tillprint_core::config::ReceiptLayout;
use tillprint_core::receipt::SalesReceipt;

use super::{footer, header, money, quantity, timestamp};
use crate::builder::EscPosBuilder;

pub(super) fn render(b: &mut EscPosBuilder, r: &SalesReceipt, layout: &ReceiptLayout) {
    let cur = layout.currency_symbol.as_str();

    header(b, layout, None);
    b.line_lr("Receipt #", &r.receipt_number);
    b.line_lr("Date", &timestamp(&r.date));
    b.line_lr("Cashier", &r.cashier);
    if let Some(customer) = r.customer_name.as_deref().filter(|c| !c.trim().is_empty()) {
        b.line_lr("Customer", customer);
    }
    b.sep_single();

    for item in &r.items {
        b.line_lr(&item.name, &money(item.total, cur));
        b.line(&format!(
            "  {} x {}",
            quantity(item.quantity),
            money(item.unit_price, cur)
        ));
    }
    b.sep_single();

    b.line_lr("Subtotal", &money(r.subtotal, cur));
    if let Some(discount) = r.discount.filter(|d| *d != 0.0) {
        b.line_lr("Discount", &money(-discount.abs(), cur));
    }
    b.line_lr("Tax", &money(r.tax, cur));
    b.bold().double_height();
    b.line_lr("TOTAL", &money(r.total, cur));
    b.reset_size().bold_off();
    b.sep_single();

    b.line_lr("Payment", &r.payment_method.to_uppercase());
    if let Some(paid) = r.amount_paid {
        b.line_lr("Paid", &money(paid, cur));
    }
    if let Some(change) = r.change {
        b.line_lr("Change", &money(change, cur));
    }

    footer(b, layout);
}
