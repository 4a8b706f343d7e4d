// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tillprint App: the `tillprint` binary's command line, HTTP surface, and
// logging setup.

mod cli;
mod commands;
pub mod server;
mod telemetry;

pub use server::{AppState, build_manager, router};

use tillprint_core::Result;

/// Parse the command line and run the selected command.
pub async fn run() -> Result<()> {
    cli::run().await
}
