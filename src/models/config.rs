//! Configuration data model and validation

use crate::defaults::MAX_PAYLOAD_SIZE;
use crate::types::{AppError, ErrorPolicy, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Echo server host name or address
    #[serde(default = "default_host")]
    pub host: String,

    /// Echo server port; zero means "not configured"
    #[serde(default)]
    pub port: u16,

    /// Bytes sent and expected back per iteration
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,

    /// Send/verify iterations per worker
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Worker failure policy
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Async runtime worker threads, `None` means one per CPU
    #[serde(default)]
    pub runtime_threads: Option<usize>,

    /// URL fetched by the HTTP probe
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: crate::defaults::DEFAULT_PORT,
            payload_size: default_payload_size(),
            iterations: default_iterations(),
            workers: default_workers(),
            error_policy: ErrorPolicy::default(),
            runtime_threads: None,
            probe_url: default_probe_url(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// `host:port` of the echo server
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Total number of (worker, iteration) pairs the run will verify
    pub fn total_iterations(&self) -> u64 {
        self.iterations.saturating_mul(self.workers as u64)
    }

    /// Runtime threads to use, falling back to the CPU count
    pub fn effective_runtime_threads(&self) -> usize {
        self.runtime_threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Validate the echo-tester settings
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::config("Echo server host cannot be empty"));
        }

        if self.port == 0 {
            return Err(AppError::config("invalid port: a non-zero --port is required"));
        }

        if self.payload_size == 0 {
            return Err(AppError::config("Payload size must be greater than 0"));
        }

        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(AppError::config(format!(
                "Payload size {} exceeds the maximum of {} bytes",
                self.payload_size, MAX_PAYLOAD_SIZE
            )));
        }

        if self.iterations == 0 {
            return Err(AppError::config("Loop count must be greater than 0"));
        }

        if self.workers == 0 {
            return Err(AppError::config("Thread count must be greater than 0"));
        }

        if self.runtime_threads == Some(0) {
            return Err(AppError::config("Runtime threads must be greater than 0"));
        }

        Ok(())
    }

    /// Validate the HTTP probe settings
    pub fn validate_probe(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.probe_url)
            .map_err(|e| AppError::config(format!("Invalid probe URL '{}': {}", self.probe_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::config(format!(
                "Probe URL must use http or https: {}",
                self.probe_url
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary key lookup (the process environment in production)
    pub fn merge_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ECHO_IP") {
            let host = host.trim();
            if !host.is_empty() {
                self.host = host.to_string();
            }
        }

        if let Some(port) = lookup("ECHO_PORT") {
            self.port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_PORT value '{}': {}", port, e)))?;
        }

        if let Some(size) = lookup("ECHO_SIZE") {
            self.payload_size = size.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_SIZE value '{}': {}", size, e)))?;
        }

        if let Some(iterations) = lookup("ECHO_LOOP") {
            self.iterations = iterations.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_LOOP value '{}': {}", iterations, e)))?;
        }

        if let Some(workers) = lookup("ECHO_THREAD") {
            self.workers = workers.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_THREAD value '{}': {}", workers, e)))?;
        }

        if let Some(policy) = lookup("ECHO_ON_ERROR") {
            self.error_policy = policy.parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_ON_ERROR value '{}': {}", policy, e)))?;
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Some(probe_url) = lookup("PROBE_URL") {
            let probe_url = probe_url.trim();
            if !probe_url.is_empty() {
                self.probe_url = probe_url.to_string();
            }
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_host() -> String {
    crate::defaults::DEFAULT_HOST.to_string()
}

fn default_payload_size() -> usize {
    crate::defaults::DEFAULT_PAYLOAD_SIZE
}

fn default_iterations() -> u64 {
    crate::defaults::DEFAULT_ITERATIONS
}

fn default_workers() -> usize {
    crate::defaults::DEFAULT_WORKERS
}

fn default_probe_url() -> String {
    crate::defaults::DEFAULT_PROBE_URL.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
