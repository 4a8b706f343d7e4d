// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-shot commands: `printers` and `preview`.

use serde_json::Value;

use tillprint_core::{ReceiptDocument, ReceiptType, Result};
use tillprint_document::{EscPosRenderer, ReceiptRenderer};

use crate::cli::{GlobalArgs, PreviewArgs};
use crate::{server, telemetry};

pub(crate) async fn list_printers(global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    telemetry::init(&config.telemetry)?;

    let adapter = server::build_adapter(&config).await?;
    let snapshot = adapter.cached().await;

    if snapshot.printers.is_empty() {
        println!("No printers configured ({} spooler).", adapter.backend());
        return Ok(());
    }
    for printer in &snapshot.printers {
        let marker = if printer.is_default { "*" } else { " " };
        println!("{marker} {:<32} {}", printer.name, printer.status);
    }
    Ok(())
}

pub(crate) fn preview(global: &GlobalArgs, args: PreviewArgs) -> Result<()> {
    let config = global.load_config()?;
    telemetry::init(&config.telemetry)?;

    let raw = std::fs::read_to_string(&args.file)?;
    let value: Value = serde_json::from_str(&raw)?;
    let (receipt_type, document) = parse_preview_input(value, args.receipt_type.as_deref())?;

    let rendered = EscPosRenderer::new(config.receipt).render(&document, &receipt_type);
    print!("{}", rendered.transcript);
    Ok(())
}

/// Accept either the `/print` request envelope or a bare receipt object.
fn parse_preview_input(
    value: Value,
    type_override: Option<&str>,
) -> Result<(ReceiptType, ReceiptDocument)> {
    let (tag, receipt) = match value {
        Value::Object(mut map) if map.contains_key("receipt") => {
            let tag = map.get("type").and_then(Value::as_str).map(str::to_owned);
            let receipt = map.remove("receipt").unwrap_or(Value::Null);
            (tag, receipt)
        }
        other => (None, other),
    };

    let tag = type_override.map(str::to_owned).or(tag).unwrap_or_default();
    let receipt_type = ReceiptType::parse(&tag);
    let document = ReceiptDocument::from_value(&receipt_type, receipt)?;
    Ok((receipt_type, document))
}
