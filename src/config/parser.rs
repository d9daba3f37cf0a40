//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, ProbeCli},
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Combines defaults, the .env file, environment variables and CLI arguments,
/// in increasing order of precedence
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and validate the complete configuration
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an explicit environment lookup
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref ip) = self.cli.ip {
            config.host = ip.clone();
        }
        if let Some(port) = self.cli.port {
            config.port = port;
        }
        if let Some(size) = self.cli.size {
            config.payload_size = size;
        }
        if let Some(iterations) = self.cli.loop_count {
            config.iterations = iterations;
        }
        if let Some(workers) = self.cli.thread {
            config.workers = workers;
        }
        if let Some(policy) = self.cli.on_error {
            config.error_policy = policy;
        }
        if let Some(threads) = self.cli.runtime_threads {
            config.runtime_threads = Some(threads);
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
        }
    }
}

/// Load the echo-tester configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Load the http-probe configuration; only the URL and debug flag matter
pub fn load_probe_config(cli: ProbeCli) -> Result<Config> {
    EnvManager::load_env_file(cli.debug)?;
    probe_config_with(cli, |key| std::env::var(key).ok())
}

fn probe_config_with<F>(cli: ProbeCli, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    if let Some(probe_url) = lookup("PROBE_URL") {
        let probe_url = probe_url.trim();
        if !probe_url.is_empty() {
            config.probe_url = probe_url.to_string();
        }
    }
    if let Some(url) = cli.url {
        config.probe_url = url;
    }
    config.debug = cli.debug;
    config.validate_probe()?;

    Ok(config)
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Target: {}", config.target()));
    summary.push(format!("Payload Size: {} bytes", config.payload_size));
    summary.push(format!("Iterations per Worker: {}", config.iterations));
    summary.push(format!("Workers: {}", config.workers));
    summary.push(format!("Total Iterations: {}", config.total_iterations()));
    summary.push(format!("Error Policy: {}", config.error_policy));
    summary.push(format!("Runtime Threads: {}", config.effective_runtime_threads()));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
