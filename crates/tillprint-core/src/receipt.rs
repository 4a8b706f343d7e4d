// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt documents accepted by the service.
//
// A `ReceiptDocument` is a sum type over the five receipt layouts the POS
// front-end knows how to ask for.  Documents are built once at the HTTP
// boundary by `ReceiptDocument::from_value`, which deserialises the payload
// for the requested type and then checks the field invariants (finite
// numbers, non-empty strings).  After that the document is immutable and is
// moved by value into the print pipeline.
//
// The type tag is kept separately as a `ReceiptType` so that tags this build
// does not recognise survive the round trip: they are validated and rendered
// with the sales layout, never rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TillprintError};

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

/// The five receipt layouts this build can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptKind {
    Sales,
    CashTransfer,
    ShiftClosure,
    ShiftHandoff,
    CashExpense,
}

impl ReceiptKind {
    pub const ALL: [ReceiptKind; 5] = [
        Self::Sales,
        Self::CashTransfer,
        Self::ShiftClosure,
        Self::ShiftHandoff,
        Self::CashExpense,
    ];

    /// Canonical wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::CashTransfer => "cash_transfer",
            Self::ShiftClosure => "shift_closure",
            Self::ShiftHandoff => "shift_handoff",
            Self::CashExpense => "cash_expense",
        }
    }
}

impl std::fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` tag as sent by the caller.
///
/// `Other` is the deliberate open case: callers may be newer than this
/// service and send tags it has never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReceiptType {
    Known(ReceiptKind),
    Other(String),
}

impl ReceiptType {
    /// Parse a wire tag.  Matching ignores case and treats `-` like `_`.
    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "" | "sales" | "sale" => ReceiptKind::Sales,
            "cash_transfer" | "transfer" => ReceiptKind::CashTransfer,
            "shift_closure" | "shift_close" | "closure" => ReceiptKind::ShiftClosure,
            "shift_handoff" | "handoff" => ReceiptKind::ShiftHandoff,
            "cash_expense" | "expense" => ReceiptKind::CashExpense,
            _ => return Self::Other(tag.trim().to_string()),
        };
        Self::Known(kind)
    }

    /// The recognised kind, if any.
    pub fn kind(&self) -> Option<ReceiptKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Other(_) => None,
        }
    }

    /// The layout used for this tag.  Unknown tags use the sales layout.
    pub fn template(&self) -> ReceiptKind {
        self.kind().unwrap_or(ReceiptKind::Sales)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Other(tag) => tag,
        }
    }
}

impl Default for ReceiptType {
    fn default() -> Self {
        Self::Known(ReceiptKind::Sales)
    }
}

impl From<ReceiptKind> for ReceiptType {
    fn from(kind: ReceiptKind) -> Self {
        Self::Known(kind)
    }
}

impl From<String> for ReceiptType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ReceiptType> for String {
    fn from(value: ReceiptType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ReceiptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// One line of a sales receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub name: String,
    pub quantity: f64,
    #[serde(alias = "unitPrice", alias = "price")]
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReceipt {
    #[serde(alias = "receiptNumber")]
    pub receipt_number: String,
    pub cashier: String,
    pub date: DateTime<Utc>,
    pub items: Vec<SaleItem>,
    pub subtotal: f64,
    pub tax: f64,
    #[serde(default)]
    pub discount: Option<f64>,
    pub total: f64,
    #[serde(alias = "paymentMethod")]
    pub payment_method: String,
    #[serde(default, alias = "amountPaid")]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTransferReceipt {
    #[serde(alias = "transferId")]
    pub transfer_id: String,
    #[serde(alias = "fromLocation")]
    pub from_location: String,
    #[serde(alias = "toLocation")]
    pub to_location: String,
    pub amount: f64,
    #[serde(alias = "performedBy")]
    pub performed_by: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftClosureReceipt {
    #[serde(alias = "shiftId")]
    pub shift_id: String,
    pub cashier: String,
    #[serde(alias = "openedAt")]
    pub opened_at: DateTime<Utc>,
    #[serde(alias = "closedAt")]
    pub closed_at: DateTime<Utc>,
    #[serde(alias = "openingCash")]
    pub opening_cash: f64,
    #[serde(alias = "expectedCash")]
    pub expected_cash: f64,
    #[serde(alias = "countedCash")]
    pub counted_cash: f64,
    pub variance: f64,
    #[serde(alias = "totalSales")]
    pub total_sales: f64,
    #[serde(alias = "transactionCount")]
    pub transaction_count: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftHandoffReceipt {
    #[serde(alias = "shiftId")]
    pub shift_id: String,
    #[serde(alias = "outgoingCashier")]
    pub outgoing_cashier: String,
    #[serde(alias = "incomingCashier")]
    pub incoming_cashier: String,
    #[serde(alias = "cashAmount")]
    pub cash_amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashExpenseReceipt {
    #[serde(alias = "expenseId")]
    pub expense_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    #[serde(alias = "authorizedBy")]
    pub authorized_by: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A validated receipt, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "receipt", rename_all = "snake_case")]
pub enum ReceiptDocument {
    Sales(SalesReceipt),
    CashTransfer(CashTransferReceipt),
    ShiftClosure(ShiftClosureReceipt),
    ShiftHandoff(ShiftHandoffReceipt),
    CashExpense(CashExpenseReceipt),
}

impl ReceiptDocument {
    /// Build a document from the raw `receipt` object of a request.
    ///
    /// Shape errors (missing or mistyped fields) and invariant violations
    /// both surface as `TillprintError::Validation`.
    pub fn from_value(receipt_type: &ReceiptType, value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(TillprintError::Validation(
                "receipt must be a JSON object".into(),
            ));
        }

        let document = match receipt_type.template() {
            ReceiptKind::Sales => Self::Sales(parse_payload(value)?),
            ReceiptKind::CashTransfer => Self::CashTransfer(parse_payload(value)?),
            ReceiptKind::ShiftClosure => Self::ShiftClosure(parse_payload(value)?),
            ReceiptKind::ShiftHandoff => Self::ShiftHandoff(parse_payload(value)?),
            ReceiptKind::CashExpense => Self::CashExpense(parse_payload(value)?),
        };

        document.validate()?;
        Ok(document)
    }

    pub fn kind(&self) -> ReceiptKind {
        match self {
            Self::Sales(_) => ReceiptKind::Sales,
            Self::CashTransfer(_) => ReceiptKind::CashTransfer,
            Self::ShiftClosure(_) => ReceiptKind::ShiftClosure,
            Self::ShiftHandoff(_) => ReceiptKind::ShiftHandoff,
            Self::CashExpense(_) => ReceiptKind::CashExpense,
        }
    }

    /// The caller-supplied identifier of this document, used in logs.
    pub fn reference(&self) -> &str {
        match self {
            Self::Sales(r) => &r.receipt_number,
            Self::CashTransfer(r) => &r.transfer_id,
            Self::ShiftClosure(r) => &r.shift_id,
            Self::ShiftHandoff(r) => &r.shift_id,
            Self::CashExpense(r) => &r.expense_id,
        }
    }

    /// Check the field invariants: every number finite, every required
    /// string non-blank.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Sales(r) => {
                require_text(&r.receipt_number, "receipt_number")?;
                require_text(&r.cashier, "cashier")?;
                require_text(&r.payment_method, "payment_method")?;
                if r.items.is_empty() {
                    return Err(TillprintError::invalid_field(
                        "items",
                        "must contain at least one item",
                    ));
                }
                for (index, item) in r.items.iter().enumerate() {
                    require_text(&item.name, &format!("items[{index}].name"))?;
                    require_finite(item.quantity, &format!("items[{index}].quantity"))?;
                    require_finite(item.unit_price, &format!("items[{index}].unit_price"))?;
                    require_finite(item.total, &format!("items[{index}].total"))?;
                }
                require_finite(r.subtotal, "subtotal")?;
                require_finite(r.tax, "tax")?;
                require_finite(r.total, "total")?;
                require_finite_opt(r.discount, "discount")?;
                require_finite_opt(r.amount_paid, "amount_paid")?;
                require_finite_opt(r.change, "change")?;
            }
            Self::CashTransfer(r) => {
                require_text(&r.transfer_id, "transfer_id")?;
                require_text(&r.from_location, "from_location")?;
                require_text(&r.to_location, "to_location")?;
                require_text(&r.performed_by, "performed_by")?;
                require_finite(r.amount, "amount")?;
            }
            Self::ShiftClosure(r) => {
                require_text(&r.shift_id, "shift_id")?;
                require_text(&r.cashier, "cashier")?;
                require_finite(r.opening_cash, "opening_cash")?;
                require_finite(r.expected_cash, "expected_cash")?;
                require_finite(r.counted_cash, "counted_cash")?;
                require_finite(r.variance, "variance")?;
                require_finite(r.total_sales, "total_sales")?;
            }
            Self::ShiftHandoff(r) => {
                require_text(&r.shift_id, "shift_id")?;
                require_text(&r.outgoing_cashier, "outgoing_cashier")?;
                require_text(&r.incoming_cashier, "incoming_cashier")?;
                require_finite(r.cash_amount, "cash_amount")?;
            }
            Self::CashExpense(r) => {
                require_text(&r.expense_id, "expense_id")?;
                require_text(&r.category, "category")?;
                require_text(&r.description, "description")?;
                require_text(&r.authorized_by, "authorized_by")?;
                require_finite(r.amount, "amount")?;
            }
        }
        Ok(())
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| TillprintError::Validation(e.to_string()))
}

#[inline]
fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TillprintError::invalid_field(field, "must not be empty"));
    }
    Ok(())
}

#[inline]
fn require_finite(value: f64, field: &str) -> Result<()> {
    if !value.is_finite() {
        return Err(TillprintError::invalid_field(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    Ok(())
}

#[inline]
fn require_finite_opt(value: Option<f64>, field: &str) -> Result<()> {
    match value {
        Some(v) => require_finite(v, field),
        None => Ok(()),
    }
}
