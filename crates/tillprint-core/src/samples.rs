// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed sample receipts used by the test-print endpoints and benchmarks.

use chrono::{DateTime, Duration, Utc};

use crate::receipt::{
    CashExpenseReceipt, CashTransferReceipt, ReceiptDocument, ReceiptKind, SaleItem,
    SalesReceipt, ShiftClosureReceipt, ShiftHandoffReceipt,
};

/// Build the sample document for `kind`, stamped with `now`.
pub fn sample(kind: ReceiptKind, now: DateTime<Utc>) -> ReceiptDocument {
    match kind {
        ReceiptKind::Sales => ReceiptDocument::Sales(SalesReceipt {
            receipt_number: "TEST-0001".into(),
            cashier: "Test Cashier".into(),
            date: now,
            items: vec![
                SaleItem {
                    name: "Espresso".into(),
                    quantity: 2.0,
                    unit_price: 2.50,
                    total: 5.00,
                },
                SaleItem {
                    name: "Blueberry Muffin".into(),
                    quantity: 1.0,
                    unit_price: 3.25,
                    total: 3.25,
                },
                SaleItem {
                    name: "Bottled Water".into(),
                    quantity: 3.0,
                    unit_price: 1.00,
                    total: 3.00,
                },
            ],
            subtotal: 11.25,
            tax: 0.90,
            discount: Some(0.50),
            total: 11.65,
            payment_method: "cash".into(),
            amount_paid: Some(20.00),
            change: Some(8.35),
            customer_name: None,
        }),
        ReceiptKind::CashTransfer => ReceiptDocument::CashTransfer(CashTransferReceipt {
            transfer_id: "TR-TEST-01".into(),
            from_location: "Register 1".into(),
            to_location: "Back Office Safe".into(),
            amount: 250.00,
            performed_by: "Test Cashier".into(),
            date: now,
            reason: Some("Drawer over limit".into()),
        }),
        ReceiptKind::ShiftClosure => ReceiptDocument::ShiftClosure(ShiftClosureReceipt {
            shift_id: "SHIFT-TEST-01".into(),
            cashier: "Test Cashier".into(),
            opened_at: now - Duration::hours(8),
            closed_at: now,
            opening_cash: 100.00,
            expected_cash: 842.60,
            counted_cash: 840.00,
            variance: -2.60,
            total_sales: 742.60,
            transaction_count: 57,
            notes: Some("Sample closure".into()),
        }),
        ReceiptKind::ShiftHandoff => ReceiptDocument::ShiftHandoff(ShiftHandoffReceipt {
            shift_id: "SHIFT-TEST-01".into(),
            outgoing_cashier: "Test Cashier".into(),
            incoming_cashier: "Relief Cashier".into(),
            cash_amount: 300.00,
            date: now,
            notes: None,
        }),
        ReceiptKind::CashExpense => ReceiptDocument::CashExpense(CashExpenseReceipt {
            expense_id: "EXP-TEST-01".into(),
            category: "Supplies".into(),
            description: "Thermal paper rolls".into(),
            amount: 18.40,
            authorized_by: "Store Manager".into(),
            date: now,
            reference: Some("INV-4471".into()),
        }),
    }
}
