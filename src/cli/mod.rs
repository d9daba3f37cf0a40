//! Command-line interfaces for the echo tester and the HTTP probe

use crate::types::ErrorPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Echo Tester - verify that a TCP echo server returns every byte it receives
#[derive(Parser, Debug, Clone)]
#[command(name = "echo-tester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Echo server host [default: 127.0.0.1]
    #[arg(long)]
    pub ip: Option<String>,

    /// Echo server port (required, must be non-zero)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bytes sent and expected back per iteration, at most 64 MiB [default: 1024]
    #[arg(long)]
    pub size: Option<usize>,

    /// Send/verify iterations per worker [default: 1]
    #[arg(long = "loop", value_name = "COUNT")]
    pub loop_count: Option<u64>,

    /// Number of concurrent workers [default: 1]
    #[arg(long)]
    pub thread: Option<usize>,

    /// What to do when a worker hits a transport error (abort, isolate)
    #[arg(long, value_name = "POLICY")]
    pub on_error: Option<ErrorPolicy>,

    /// Async runtime worker threads [default: number of CPUs]
    #[arg(long, value_name = "N")]
    pub runtime_threads: Option<usize>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Write an example .env file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub init_env: Option<PathBuf>,

    /// List the supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line:\n");
        if let Some(ref ip) = self.ip {
            summary.push_str(&format!("  Host: {}\n", ip));
        }
        if let Some(port) = self.port {
            summary.push_str(&format!("  Port: {}\n", port));
        }
        if let Some(size) = self.size {
            summary.push_str(&format!("  Payload size: {}\n", size));
        }
        if let Some(loop_count) = self.loop_count {
            summary.push_str(&format!("  Iterations: {}\n", loop_count));
        }
        if let Some(thread) = self.thread {
            summary.push_str(&format!("  Workers: {}\n", thread));
        }
        if let Some(policy) = self.on_error {
            summary.push_str(&format!("  Error policy: {}\n", policy));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// HTTP Probe - issue one GET request and print the response body
#[derive(Parser, Debug, Clone)]
#[command(name = "http-probe")]
#[command(version, about, long_about = None)]
pub struct ProbeCli {
    /// URL to fetch [default: http://127.0.0.1:8080/index.html]
    #[arg(long)]
    pub url: Option<String>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// Echo Server - write back every byte each client sends
#[derive(Parser, Debug, Clone)]
#[command(name = "echo-server")]
#[command(version, about, long_about = None)]
pub struct ServerCli {
    /// Address to listen on
    #[arg(long, env = "ECHO_SERVER_IP", default_value = crate::defaults::DEFAULT_SERVER_HOST)]
    pub ip: String,

    /// Port to listen on; 0 picks a free port
    #[arg(long, env = "ECHO_SERVER_PORT", default_value_t = crate::defaults::DEFAULT_SERVER_PORT)]
    pub port: u16,

    /// Do not log client connections
    #[arg(long, short)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl ServerCli {
    /// Logging settings for the server, expressed as a run configuration
    pub fn log_config(&self) -> crate::models::Config {
        crate::models::Config {
            enable_color: !self.no_color && supports_color(),
            verbose: !self.quiet,
            debug: self.debug,
            ..Default::default()
        }
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
