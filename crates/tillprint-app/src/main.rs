// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tillprint: local receipt print service.
//
// Entry point. Everything else lives in the library so the router can be
// exercised from integration tests.

#[tokio::main]
async fn main() {
    if let Err(err) = tillprint_app::run().await {
        eprintln!("tillprint: {err}");
        std::process::exit(1);
    }
}
