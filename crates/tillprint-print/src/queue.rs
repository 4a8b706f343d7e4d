// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bounded in-memory retry queue.
//
// Holds receipts whose printer was not online when they were requested.
// Strict FIFO: jobs are appended at the back and only ever leave by id,
// which in practice is always the front job during a drain pass.  Nothing
// is persisted; a restart loses the queue.

use std::collections::VecDeque;

use tracing::{debug, info, instrument};

use tillprint_core::error::{Result, TillprintError};
use tillprint_core::types::{JobId, QueuedJob, QueuedJobSummary};

/// FIFO job queue with a fixed capacity.
#[derive(Debug)]
pub struct JobQueue {
    jobs: VecDeque<QueuedJob>,
    capacity: usize,
}

impl JobQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a job.  Returns its 1-based position, or `QueueFull`.
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub fn push(&mut self, job: QueuedJob) -> Result<usize> {
        if self.is_full() {
            return Err(TillprintError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.jobs.push_back(job);
        let position = self.jobs.len();
        info!(position, queue_len = position, "job queued");
        Ok(position)
    }

    /// The oldest job, left in place.
    pub fn front(&self) -> Option<&QueuedJob> {
        self.jobs.front()
    }

    /// Remove a job by id.
    pub fn remove(&mut self, id: &JobId) -> Option<QueuedJob> {
        let index = self.jobs.iter().position(|j| &j.id == id)?;
        let job = self.jobs.remove(index);
        debug!(job_id = %id, queue_len = self.jobs.len(), "job removed from queue");
        job
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Status view of every queued job, oldest first.
    pub fn summaries(&self) -> Vec<QueuedJobSummary> {
        self.jobs.iter().map(QueuedJob::summary).collect()
    }
}
