// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Periodic printer refresh.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::manager::JobManager;

/// Refresh the printer snapshot every `interval` and start a drain pass
/// when the front queued receipt can move.
///
/// The first refresh happens one interval after the call; the caller is
/// expected to have taken an initial snapshot already.
pub fn spawn_monitor(manager: JobManager, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            tick(&manager).await;
        }
    })
}

/// One monitor cycle.
///
/// A drain is only started when the fresh snapshot lets the front job make
/// progress; an offline target waits for a later tick.
pub async fn tick(manager: &JobManager) {
    let report = match manager.refresh_printers().await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "periodic printer refresh failed");
            return;
        }
    };

    for name in &report.recovered {
        info!(printer = %name, "printer back online");
    }

    if !manager.front_job_ready(&report.printers).await {
        let queue_len = manager.queue_len().await;
        if queue_len > 0 {
            debug!(queue_len, "queued receipts still waiting for their printer");
        }
        return;
    }

    if manager.trigger_drain() {
        let queue_len = manager.queue_len().await;
        info!(
            queue_len,
            recovered = report.recovered.len(),
            "drain pass started by printer refresh"
        );
    }
}
