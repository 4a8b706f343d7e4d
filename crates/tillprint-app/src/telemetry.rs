// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Log subscriber setup.

use tracing_subscriber::EnvFilter;

use tillprint_core::config::TelemetryConfig;
use tillprint_core::{Result, TillprintError};

/// Install the global subscriber.  `RUST_LOG` wins over the configured
/// level.  Logs go to stderr so `preview` output stays clean on stdout.
pub(crate) fn init(config: &TelemetryConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            TillprintError::Config(format!("invalid log level '{}': {e}", config.log_level))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| TillprintError::Config(format!("cannot install log subscriber: {e}")))
}
