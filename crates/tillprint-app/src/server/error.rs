// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use tillprint_core::human_errors::humanize_error;
use tillprint_core::{ErrorKind, TillprintError};

/// A `TillprintError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub TillprintError);

impl From<TillprintError> for ApiError {
    fn from(value: TillprintError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TillprintError::Validation(rejection.body_text()))
    }
}

/// HTTP status for each error kind.
///
/// Only malformed requests are client errors.  Everything the manager or the
/// spooler reports is a 500; the body's `kind` tells them apart.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NoPrintersAvailable
        | ErrorKind::PrinterNotFound
        | ErrorKind::QueueFull
        | ErrorKind::PrintFailed
        | ErrorKind::SpoolerUnavailable
        | ErrorKind::Spooler
        | ErrorKind::Config
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        let human = humanize_error(&self.0);

        if status.is_server_error() {
            error!(kind = %kind, error = %self.0, "request failed");
        } else {
            warn!(kind = %kind, error = %self.0, "request rejected");
        }

        let body = Json(json!({
            "success": false,
            "kind": kind,
            "message": human.message,
            "detail": self.0.to_string(),
            "suggestion": human.suggestion,
            "retriable": human.retriable,
            "severity": human.severity,
        }));
        (status, body).into_response()
    }
}
