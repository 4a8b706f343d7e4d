// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Route handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use tillprint_core::samples::sample;
use tillprint_core::types::{JobId, PrintOutcome, ServiceStatus};
use tillprint_core::{ReceiptDocument, ReceiptKind, ReceiptType};
use tillprint_print::PrinterSnapshot;

use super::AppState;
use super::error::ApiError;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `/print` and `/preview`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrintRequest {
    #[serde(default, rename = "type")]
    pub(crate) receipt_type: Option<String>,
    pub(crate) receipt: Value,
    #[serde(default, alias = "printer_name")]
    pub(crate) printer_name: Option<String>,
}

impl PrintRequest {
    fn into_document(self) -> Result<(ReceiptType, ReceiptDocument, Option<String>), ApiError> {
        let receipt_type = ReceiptType::parse(self.receipt_type.as_deref().unwrap_or_default());
        let document = ReceiptDocument::from_value(&receipt_type, self.receipt)?;
        Ok((receipt_type, document, self.printer_name))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrintResponse {
    success: bool,
    kind: &'static str,
    message: String,
    printer_id: String,
    queued: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spooler_job: Option<String>,
    timestamp: DateTime<Utc>,
}

impl From<PrintOutcome> for PrintResponse {
    fn from(outcome: PrintOutcome) -> Self {
        match outcome {
            PrintOutcome::Printed {
                printer_name,
                timestamp,
                handle,
            } => Self {
                success: true,
                kind: "printed",
                message: format!("Receipt sent to {printer_name}."),
                printer_id: printer_name,
                queued: false,
                position: None,
                job_id: None,
                spooler_job: Some(handle.0),
                timestamp,
            },
            PrintOutcome::Queued {
                job_id,
                position,
                printer_name,
            } => Self {
                success: true,
                kind: "queued",
                message: format!(
                    "{printer_name} is offline. The receipt is queued at position {position} \
                     and will print when the printer comes back."
                ),
                printer_id: printer_name,
                queued: true,
                position: Some(position),
                job_id: Some(job_id),
                spooler_job: None,
                timestamp: Utc::now(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    success: bool,
    #[serde(rename = "type")]
    receipt_type: String,
    transcript: String,
    lines: usize,
    bytes: usize,
    checksum: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TestPrintQuery {
    printer: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /print
pub(crate) async fn print(
    State(state): State<AppState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> Result<Json<PrintResponse>, ApiError> {
    let Json(request) = payload?;
    let (receipt_type, document, printer) = request.into_document()?;
    let outcome = state
        .manager
        .submit_print(document, receipt_type, printer)
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /preview
pub(crate) async fn preview(
    State(state): State<AppState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Json(request) = payload?;
    let (receipt_type, document, _) = request.into_document()?;
    let rendered = state.manager.preview_print(&document, &receipt_type);
    Ok(Json(PreviewResponse {
        success: true,
        receipt_type: receipt_type.to_string(),
        lines: rendered.line_count(),
        bytes: rendered.bytes.len(),
        checksum: rendered.checksum(),
        transcript: rendered.transcript,
    }))
}

/// GET /status
pub(crate) async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.manager.status().await)
}

/// GET /printers
pub(crate) async fn printers(State(state): State<AppState>) -> Json<PrinterSnapshot> {
    Json(state.manager.printers().await)
}

/// GET /health
pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /test-*: print the built-in sample of `kind`.
pub(crate) async fn test_print(
    State(state): State<AppState>,
    Query(query): Query<TestPrintQuery>,
    kind: ReceiptKind,
) -> Result<Json<PrintResponse>, ApiError> {
    let document = sample(kind, Utc::now());
    let outcome = state
        .manager
        .submit_print(document, kind.into(), query.printer)
        .await?;
    Ok(Json(outcome.into()))
}
