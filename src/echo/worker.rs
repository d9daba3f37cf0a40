//! The echo verification worker

use super::{receive_exact_into, send_exact, EchoConnector, FailureCounter, PayloadGenerator};
use crate::error::Result;
use crate::logging::{EchoLogger, LogLevel};
use crate::models::{Config, WorkerReport};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// One worker: a single connection driven through `iterations` send/verify rounds.
///
/// Mismatches are counted, never raised. Transport failures end the worker
/// with an error; whatever progress was made stays readable via [`report`].
///
/// [`report`]: EchoWorker::report
pub struct EchoWorker {
    id: usize,
    payload_size: usize,
    iterations: u64,
    counter: FailureCounter,
    generator: PayloadGenerator,
    report: WorkerReport,
    logger: Option<Arc<EchoLogger>>,
}

impl EchoWorker {
    pub fn new(id: usize, payload_size: usize, iterations: u64, counter: FailureCounter) -> Self {
        Self {
            id,
            payload_size,
            iterations,
            counter,
            generator: PayloadGenerator::from_entropy(),
            report: WorkerReport::new(id),
            logger: None,
        }
    }

    pub fn from_config(id: usize, config: &Config, counter: FailureCounter) -> Self {
        Self::new(id, config.payload_size, config.iterations, counter)
    }

    /// Replace the entropy-seeded generator, e.g. with a seeded one
    pub fn with_generator(mut self, generator: PayloadGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_logger(mut self, logger: Arc<EchoLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Progress so far
    pub fn report(&self) -> &WorkerReport {
        &self.report
    }

    /// Connect through `connector` and run every iteration on that one stream
    pub async fn run<C>(&mut self, connector: &C, host: &str, port: u16) -> Result<WorkerReport>
    where
        C: EchoConnector + ?Sized,
    {
        let target = format!("{}:{}", host, port);
        let mut stream = match connector.connect(host, port).await {
            Ok(stream) => stream,
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.log_connection(self.id, &target, Some(&e)).await;
                }
                return Err(e);
            }
        };

        if let Some(logger) = &self.logger {
            logger.log_connection(self.id, &target, None).await;
        }

        self.run_iterations(&mut stream).await
    }

    /// Generate, send, receive and compare `iterations` times over `stream`
    pub async fn run_iterations<S>(&mut self, stream: &mut S) -> Result<WorkerReport>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
    {
        let mut payload = vec![0u8; self.payload_size];
        let mut echoed = vec![0u8; self.payload_size];

        for iteration in 0..self.iterations {
            self.generator.fill(&mut payload);

            let sent = send_exact(stream, &payload).await?;
            self.report.bytes_sent += sent as u64;

            receive_exact_into(stream, &mut echoed).await?;
            self.report.bytes_received += echoed.len() as u64;

            if payload != echoed {
                self.counter.increment();
                self.report.mismatches += 1;

                if let Some(logger) = self.logger.as_ref().filter(|l| l.logger().would_log(LogLevel::Debug)) {
                    let first_difference = payload.iter().zip(echoed.iter()).position(|(a, b)| a != b);
                    logger.log_mismatch(self.id, iteration, first_difference, self.payload_size).await;
                }
            }

            self.report.iterations_completed += 1;
        }

        Ok(self.report.clone())
    }
}
