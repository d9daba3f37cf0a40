//! Echo Tester - Main CLI Application
//!
//! Launches concurrent workers against a TCP echo server and reports whether
//! every payload came back unchanged.

use clap::Parser;
use echo_tester::{
    cli::Cli,
    config::{display_config_summary, load_config, EnvManager},
    error::{AppError, ErrorReporter, Result},
    executor::Coordinator,
    logging::LoggerFactory,
    models::Config,
    output::OutputCoordinator,
    BUILD_TIME, GIT_COMMIT, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::path::Path;
use std::process;
use std::sync::Arc;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(msg) = cli.validate() {
        eprintln!("Error: {}", msg);
        process::exit(1);
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Everything up to and including the runtime; config errors never start it
fn run_application(cli: Cli) -> Result<()> {
    if let Some(path) = cli.init_env.clone() {
        EnvManager::save_example_env_file(&path)?;
        println!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    if cli.env_help {
        print!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Built {} from {} for {}", BUILD_TIME, GIT_COMMIT, TARGET_TRIPLE);
        println!("Debug mode enabled");
        println!();
        print!("{}", cli.get_config_summary());
    }

    let config = load_config(cli)?;

    if config.debug {
        println!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            println!("  {}", line);
        }
        for warning in EnvManager::validate_current_env() {
            println!("  {}", warning);
        }
        if let Some(warnings) = EnvManager::check_env_file(Path::new(".env"))? {
            for warning in warnings {
                println!("  .env: {}", warning);
            }
        }
        println!();
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.effective_runtime_threads())
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start async runtime: {}", e)))?;

    runtime.block_on(run_echo_test(config))
}

async fn run_echo_test(config: Config) -> Result<()> {
    let factory = LoggerFactory::new(config.clone());
    let logger = Arc::new(factory.create_echo_logger().await);
    logger.logger().add_context_field("target".to_string(), config.target()).await;

    if config.verbose || config.debug {
        println!(
            "Starting {} workers x {} iterations of {} bytes against {}",
            config.workers,
            config.iterations,
            config.payload_size,
            config.target()
        );
    }

    let report = Coordinator::new(config.clone())
        .with_logger(logger)
        .run()
        .await?;

    let output = OutputCoordinator::from_config(&config);
    println!("{}", output.display_results(&report)?);

    let failed = report.failed_workers();
    if failed > 0 {
        if config.verbose {
            let reporter = ErrorReporter::new(config.enable_color, true);
            eprintln!("{}", reporter.format_error_summary(&report.worker_errors()));
        }
        return Err(AppError::test_execution(format!(
            "{} of {} workers failed",
            failed,
            report.outcomes.len()
        )));
    }

    // Mismatches are reported in the summary line but do not change the exit code
    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Pass the echo server port with --port (or ECHO_PORT)");
            eprintln!("  - --size, --loop and --thread must be at least 1");
            eprintln!("  - Run with --init-env .env to write an example configuration");
        }
        AppError::Connection(_) => {
            eprintln!();
            eprintln!("Connection troubleshooting:");
            eprintln!("  - Check that the echo server is running");
            eprintln!("  - Verify --ip and --port");
            eprintln!("  - Use --on-error isolate to keep the other workers running");
        }
        AppError::Write(_) | AppError::Read(_) => {
            eprintln!();
            eprintln!("Transport troubleshooting:");
            eprintln!("  - The server closed the connection mid-transfer");
            eprintln!("  - Check that it echoes exactly the bytes it receives");
        }
        AppError::TestExecution(_) => {
            eprintln!();
            eprintln!("Execution troubleshooting:");
            eprintln!("  - Re-run with --verbose to see the per-worker table");
            eprintln!("  - Reduce --thread to check whether the server limits connections");
        }
        _ => {}
    }
}
