//! Echo Tester
//!
//! A concurrent TCP echo-server load tester. Every worker opens its own
//! connection, sends random payloads and verifies that the server echoes
//! them back byte-for-byte. A reference echo server and a small HTTP GET
//! probe ship alongside it.

pub mod cli;
pub mod config;
pub mod echo;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use echo::{EchoWorker, FailureCounter, PayloadGenerator, WorkerReport};
pub use executor::{Coordinator, RunReport};
pub use models::Config;
pub use server::EchoServer;
pub use types::ErrorPolicy;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// Zero is deliberately invalid and must be overridden
    pub const DEFAULT_PORT: u16 = 0;
    pub const DEFAULT_PAYLOAD_SIZE: usize = 1024;
    /// Each worker holds two buffers of this size
    pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;
    pub const DEFAULT_ITERATIONS: u64 = 1;
    pub const DEFAULT_WORKERS: usize = 1;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_PROBE_URL: &str = "http://127.0.0.1:8080/index.html";
    pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
    pub const DEFAULT_SERVER_PORT: u16 = 8080;
}
