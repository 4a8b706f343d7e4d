// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP service: wiring of spooler, job manager, monitor, and routes.

mod error;
mod routes;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};

use tillprint_core::config::SpoolerBackend;
use tillprint_core::{AppConfig, ReceiptKind, Result};
use tillprint_document::EscPosRenderer;
use tillprint_print::{
    CupsSpooler, JobManager, MemorySpooler, Spooler, SpoolerAdapter, spawn_monitor,
};

use crate::cli::{GlobalArgs, ServeArgs};
use crate::telemetry;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: JobManager,
}

impl AppState {
    pub fn new(manager: JobManager) -> Self {
        Self { manager }
    }
}

/// Test-print endpoints and the sample each one prints.
const TEST_ROUTES: [(&str, ReceiptKind); 5] = [
    ("/test-print", ReceiptKind::Sales),
    ("/test-transfer", ReceiptKind::CashTransfer),
    ("/test-shift-closure", ReceiptKind::ShiftClosure),
    ("/test-shift-handoff", ReceiptKind::ShiftHandoff),
    ("/test-cash-expense", ReceiptKind::CashExpense),
];

/// All routes, without middleware.
pub fn router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/print", post(routes::print))
        .route("/preview", post(routes::preview))
        .route("/status", get(routes::status))
        .route("/printers", get(routes::printers))
        .route("/health", get(routes::health));

    for (path, kind) in TEST_ROUTES {
        router = router.route(
            path,
            post(
                move |state: State<AppState>, query: Query<routes::TestPrintQuery>| {
                    routes::test_print(state, query, kind)
                },
            ),
        );
    }

    router.with_state(state)
}

/// Build the configured spooler and take the first printer snapshot.
///
/// Fails with `SpoolerUnavailable` when the CUPS scheduler is not running.
pub async fn build_adapter(config: &AppConfig) -> Result<Arc<SpoolerAdapter>> {
    let spooler: Arc<dyn Spooler> = match config.spooler.backend {
        SpoolerBackend::Cups => Arc::new(CupsSpooler::from_config(&config.spooler)),
        SpoolerBackend::Memory => Arc::new(MemorySpooler::demo()),
    };
    let span = info_span!("spooler", backend = spooler.backend());
    let adapter = Arc::new(SpoolerAdapter::new(spooler, span));
    adapter.initialize().await?;
    Ok(adapter)
}

/// Build the job manager the HTTP surface talks to.
pub async fn build_manager(config: &AppConfig) -> Result<JobManager> {
    let adapter = build_adapter(config).await?;
    let renderer = Arc::new(EscPosRenderer::new(config.receipt.clone()));
    Ok(JobManager::new(
        adapter,
        renderer,
        config.queue.capacity,
        info_span!("jobs"),
    ))
}

pub(crate) async fn run(global: &GlobalArgs, args: ServeArgs) -> Result<()> {
    let mut config = global.load_config()?;
    telemetry::init(&config.telemetry)?;
    args.apply(&mut config)?;

    let manager = build_manager(&config).await?;
    let monitor = spawn_monitor(manager.clone(), config.refresh_interval());

    let app = router(AppState::new(manager.clone())).layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let snapshot = manager.printers().await;
    info!(
        %addr,
        backend = manager.adapter().backend(),
        printers = snapshot.printers.len(),
        queue_capacity = config.queue.capacity,
        "tillprint ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.abort();
    let queue_len = manager.queue_len().await;
    if queue_len > 0 {
        warn!(queue_len, "shutting down with queued receipts; they will not be printed");
    }
    info!("tillprint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C, the service must be killed to stop");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
