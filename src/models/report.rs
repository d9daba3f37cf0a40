//! Per-worker and per-run result models

use crate::error::AppError;
use crate::types::WorkerStatus;
use serde::{Deserialize, Serialize};

/// Progress of a single echo worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Index of the worker within the run (0-based)
    pub worker_id: usize,
    /// Iterations whose payload was sent, echoed and compared
    pub iterations_completed: u64,
    /// Iterations whose echo did not match the payload
    pub mismatches: u64,
    /// Payload bytes written to the server
    pub bytes_sent: u64,
    /// Echo bytes read back from the server
    pub bytes_received: u64,
}

impl WorkerReport {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Default::default()
        }
    }
}

/// How a worker ended, with the error if it failed
#[derive(Debug)]
pub struct WorkerOutcome {
    pub report: WorkerReport,
    pub status: WorkerStatus,
    pub error: Option<AppError>,
}

impl WorkerOutcome {
    pub fn completed(report: WorkerReport) -> Self {
        Self {
            report,
            status: WorkerStatus::Completed,
            error: None,
        }
    }

    pub fn failed(report: WorkerReport, error: AppError) -> Self {
        Self {
            report,
            status: WorkerStatus::Failed,
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == WorkerStatus::Failed
    }
}

/// Everything the coordinator learned from one run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Final value of the shared failure counter
    pub failures: u64,
    /// One entry per worker, ordered by worker id
    pub outcomes: Vec<WorkerOutcome>,
}

impl RunReport {
    pub fn new(failures: u64, mut outcomes: Vec<WorkerOutcome>) -> Self {
        outcomes.sort_by_key(|outcome| outcome.report.worker_id);
        Self { failures, outcomes }
    }

    /// No mismatches and no failed workers
    pub fn is_success(&self) -> bool {
        self.failures == 0 && self.failed_workers() == 0
    }

    pub fn failed_workers(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Errors of the failed workers, in worker order
    pub fn worker_errors(&self) -> Vec<&AppError> {
        self.outcomes.iter().filter_map(|o| o.error.as_ref()).collect()
    }

    pub fn iterations_completed(&self) -> u64 {
        self.outcomes.iter().map(|o| o.report.iterations_completed).sum()
    }

    /// Mismatches as seen by the workers themselves; equals `failures`
    pub fn reported_mismatches(&self) -> u64 {
        self.outcomes.iter().map(|o| o.report.mismatches).sum()
    }
}
