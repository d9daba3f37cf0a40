//! Data models and structures for the echo tester

pub mod config;
pub mod report;

// Re-export main model types
pub use config::Config;
pub use report::{RunReport, WorkerOutcome, WorkerReport};
