//! HTTP Probe - fetch one URL and print the body

use clap::Parser;
use echo_tester::{
    cli::ProbeCli,
    config::load_probe_config,
    error::{ErrorReporter, Result},
    probe::HttpProbe,
};
use std::process;

#[tokio::main]
async fn main() {
    let cli = ProbeCli::parse();
    let reporter = ErrorReporter::new(false, cli.debug);

    if let Err(e) = run(cli).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: ProbeCli) -> Result<()> {
    let config = load_probe_config(cli)?;

    if config.debug {
        eprintln!("GET {}", config.probe_url);
    }

    let response = HttpProbe::new()?.fetch(&config.probe_url).await?;

    if config.debug {
        eprintln!("Status: {}", response.status);
    }

    println!("{}", response.body);
    Ok(())
}
