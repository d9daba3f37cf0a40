//! Environment variable handling and .env file management

use crate::defaults::MAX_PAYLOAD_SIZE;
use crate::error::{AppError, Result};
use crate::types::ErrorPolicy;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; variables already set are kept
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                println!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Echo Tester Configuration
#
# Values set here are used as defaults and can be overridden by
# environment variables and command-line arguments.

# Echo server host
# ECHO_IP=127.0.0.1

# Echo server port (required, must be non-zero)
# ECHO_PORT=9000

# Bytes sent and expected back per iteration (at most 64 MiB)
# ECHO_SIZE=1024

# Send/verify iterations per worker
# ECHO_LOOP=1

# Number of concurrent workers
# ECHO_THREAD=1

# Worker failure policy: abort or isolate
# ECHO_ON_ERROR=abort

# Enable colored output (true/false)
# ENABLE_COLOR=true

# URL fetched by http-probe
# PROBE_URL=http://127.0.0.1:8080/index.html

# Example configurations:
#
# Stress a local server with many small payloads:
# ECHO_PORT=7
# ECHO_SIZE=16
# ECHO_LOOP=10000
# ECHO_THREAD=32
#
# Keep going when single connections drop:
# ECHO_ON_ERROR=isolate
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::io(format!("Failed to write example .env file {}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "ECHO_IP" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("ECHO_IP cannot be empty"));
                }
            }
            "ECHO_PORT" => {
                let port: u16 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid ECHO_PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("ECHO_PORT must be between 1 and 65535"));
                }
            }
            "ECHO_SIZE" | "ECHO_THREAD" => {
                let n: usize = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if n == 0 {
                    return Err(AppError::config(format!("{} must be greater than 0", key)));
                }
                if key == "ECHO_SIZE" && n > MAX_PAYLOAD_SIZE {
                    return Err(AppError::config(format!(
                        "ECHO_SIZE must be at most {} bytes",
                        MAX_PAYLOAD_SIZE
                    )));
                }
            }
            "ECHO_LOOP" => {
                let n: u64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid ECHO_LOOP value '{}': {}", value, e)))?;
                if n == 0 {
                    return Err(AppError::config("ECHO_LOOP must be greater than 0"));
                }
            }
            "ECHO_ON_ERROR" => {
                value.parse::<ErrorPolicy>()
                    .map_err(|e| AppError::config(format!("Invalid ECHO_ON_ERROR value '{}': {}", value, e)))?;
            }
            "ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "PROBE_URL" => {
                let parsed = url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid PROBE_URL value '{}': {}", value, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!("PROBE_URL must use http or https: {}", value)));
                }
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("ECHO_IP", "Echo server host", "127.0.0.1"),
            ("ECHO_PORT", "Echo server port (1-65535)", "9000"),
            ("ECHO_SIZE", "Bytes per iteration (at most 64 MiB)", "1024"),
            ("ECHO_LOOP", "Iterations per worker", "100"),
            ("ECHO_THREAD", "Concurrent workers", "8"),
            ("ECHO_ON_ERROR", "Worker failure policy (abort, isolate)", "abort"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("PROBE_URL", "URL fetched by http-probe", "http://127.0.0.1:8080/index.html"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<14} {}\n", var, description));
            help.push_str(&format!("  {:<14} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }

    /// Check an env file's lines without loading it; `None` when the file is absent
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Err(e) = Self::validate_env_var(key.trim(), value.trim()) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}
