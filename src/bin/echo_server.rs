//! Echo Server - accept clients and write back every byte they send

use clap::Parser;
use echo_tester::{
    cli::ServerCli,
    error::{ErrorReporter, Result},
    logging::LoggerFactory,
    server::EchoServer,
};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = ServerCli::parse();
    let reporter = ErrorReporter::new(!cli.no_color, cli.debug);

    if let Err(e) = run(cli).await {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: ServerCli) -> Result<()> {
    let factory = LoggerFactory::new(cli.log_config());
    let logger = Arc::new(factory.create_echo_logger().await);

    let server = EchoServer::bind(&cli.ip, cli.port).await?.with_logger(logger);

    // Tests and scripts read the bound port from this line
    println!("listening on {}", server.local_addr()?);

    server
        .serve_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
