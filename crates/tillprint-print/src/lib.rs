// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tillprint Print: spooler backends, the cached printer view, the retry
// queue, and the job lifecycle manager that ties them together.  This crate
// bridges between the receipt types in `tillprint-core`, the renderer in
// `tillprint-document`, and the operating system's print spooler.

pub mod adapter;
pub mod cups;
pub mod manager;
pub mod memory;
pub mod monitor;
pub mod queue;
pub mod spooler;

pub use adapter::{PrinterSnapshot, RefreshReport, SpoolerAdapter};
pub use cups::CupsSpooler;
pub use manager::{DrainReport, JobManager};
pub use memory::MemorySpooler;
pub use monitor::spawn_monitor;
pub use queue::JobQueue;
pub use spooler::Spooler;
