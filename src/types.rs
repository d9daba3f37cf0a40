//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// What the coordinator does when a worker hits a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Cancel every remaining worker and fail the whole run
    #[default]
    Abort,
    /// Mark the worker failed and let the others finish
    Isolate,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Abort => "abort",
            ErrorPolicy::Isolate => "isolate",
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(ErrorPolicy::Abort),
            "isolate" => Ok(ErrorPolicy::Isolate),
            other => Err(AppError::parse(format!(
                "Invalid error policy '{}' (expected 'abort' or 'isolate')",
                other
            ))),
        }
    }
}

/// Final state of a single worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    /// Every iteration ran; mismatches may still have been observed
    Completed,
    /// A transport error stopped the worker early
    Failed,
}
