//! Run coordination
//!
//! The coordinator validates the configuration, launches one task per
//! worker on a `JoinSet`, waits for every task and applies the error policy
//! to workers that end with a transport error.

use crate::{
    echo::{EchoConnector, EchoWorker, FailureCounter, TcpConnector},
    error::Result,
    logging::EchoLogger,
    models::{Config, WorkerOutcome, WorkerReport},
    types::ErrorPolicy,
};
use std::sync::Arc;
use tokio::task::JoinSet;

pub use crate::models::RunReport;

/// Spawns the workers of one run and joins them
pub struct Coordinator<C = TcpConnector> {
    config: Config,
    connector: Arc<C>,
    logger: Option<Arc<EchoLogger>>,
}

impl Coordinator<TcpConnector> {
    /// Coordinator talking plain TCP
    pub fn new(config: Config) -> Self {
        Self::with_connector(config, TcpConnector)
    }
}

impl<C> Coordinator<C>
where
    C: EchoConnector + 'static,
{
    pub fn with_connector(config: Config, connector: C) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<EchoLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run every worker to completion.
    ///
    /// Configuration errors are returned before any connection is attempted.
    /// Under [`ErrorPolicy::Abort`] the first worker error cancels the
    /// remaining workers and is returned; under [`ErrorPolicy::Isolate`] it
    /// is recorded in the report and the other workers keep going.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;

        let correlation_id = match &self.logger {
            Some(logger) => Some(logger.logger().start_operation("echo_run").await),
            None => None,
        };

        let counter = FailureCounter::new();
        let mut workers: JoinSet<(WorkerReport, Result<WorkerReport>)> = JoinSet::new();

        for id in 0..self.config.workers {
            let mut worker = EchoWorker::from_config(id, &self.config, counter.clone());
            if let Some(logger) = &self.logger {
                worker = worker.with_logger(Arc::clone(logger));
            }

            let connector = Arc::clone(&self.connector);
            let host = self.config.host.clone();
            let port = self.config.port;

            workers.spawn(async move {
                let result = worker.run(connector.as_ref(), &host, port).await;
                (worker.report().clone(), result)
            });
        }

        let mut outcomes = Vec::with_capacity(self.config.workers);

        while let Some(joined) = workers.join_next().await {
            let (progress, result) = match joined {
                Ok(finished) => finished,
                Err(e) => {
                    workers.abort_all();
                    return Err(e.into());
                }
            };

            match result {
                Ok(report) => {
                    if let Some(logger) = &self.logger {
                        logger.log_worker_finished(&report).await;
                    }
                    outcomes.push(WorkerOutcome::completed(report));
                }
                Err(e) => {
                    if let Some(logger) = &self.logger {
                        logger.log_worker_failed(&progress, &e).await;
                    }

                    match self.config.error_policy {
                        ErrorPolicy::Abort => {
                            workers.abort_all();
                            if let (Some(logger), Some(id)) = (&self.logger, &correlation_id) {
                                logger.logger().end_operation(id, "echo_run", false).await;
                            }
                            return Err(e);
                        }
                        ErrorPolicy::Isolate => outcomes.push(WorkerOutcome::failed(progress, e)),
                    }
                }
            }
        }

        let report = RunReport::new(counter.get(), outcomes);

        if let Some(logger) = &self.logger {
            logger.log_run_summary(&report).await;
            if let Some(id) = &correlation_id {
                logger.logger().end_operation(id, "echo_run", report.is_success()).await;
            }
        }

        Ok(report)
    }
}
