//! Structured logging for the echo tester
//!
//! This module provides:
//! - Leveled log entries with structured fields
//! - Console and JSON output formats, always written to stderr
//! - Session and correlation IDs for grouping the events of one run
//! - `EchoLogger`, the domain logger used by workers and the coordinator

use crate::error::{AppError, Result};
use crate::models::{Config, RunReport, WorkerReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    pub thread_id: Option<String>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger whose level and format follow the configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Start a correlated operation
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        if entry.correlation_id.is_none() {
            entry.correlation_id = context.current_correlation_id.clone();
        }
        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        };

        // All levels go to stderr; stdout carries only the run report
        let _ = writeln!(io::stderr(), "{}", output);
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields_str.sort();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                thread_id: std::thread::current().name().map(String::from),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Add the counters of a worker report
    pub fn worker(self, report: &WorkerReport) -> Self {
        self.field("worker", report.worker_id)
            .field("iterations", report.iterations_completed)
            .field("mismatches", report.mismatches)
            .field("bytes_sent", report.bytes_sent)
            .field("bytes_received", report.bytes_received)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_transport", error.is_transport())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for echo worker and run events
pub struct EchoLogger {
    logger: Logger,
}

impl EchoLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("ECHO".to_string(), config),
        }
    }

    /// Access the underlying logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Log connection attempt
    pub async fn log_connection(&self, worker_id: usize, target: &str, error: Option<&AppError>) {
        match error {
            None => {
                self.logger.debug(&format!("Worker {} connected to {}", worker_id, target))
                    .field("worker", worker_id)
                    .field("target", target)
                    .field("success", true)
                    .log()
                    .await;
            }
            Some(err) => {
                self.logger.error(&format!("Worker {} failed to connect to {}: {}", worker_id, target, err))
                    .field("worker", worker_id)
                    .field("target", target)
                    .field("success", false)
                    .error_info(err)
                    .log()
                    .await;
            }
        }
    }

    /// Log an echoed payload that differs from what was sent
    pub async fn log_mismatch(&self, worker_id: usize, iteration: u64, first_difference: Option<usize>, size: usize) {
        self.logger.debug(&format!("Worker {} iteration {}: echo mismatch", worker_id, iteration))
            .field("worker", worker_id)
            .field("iteration", iteration)
            .field("first_difference", first_difference)
            .field("size", size)
            .log()
            .await;
    }

    /// Log a worker that ran all its iterations
    pub async fn log_worker_finished(&self, report: &WorkerReport) {
        self.logger.info(&format!(
            "Worker {} finished {} iterations with {} mismatches",
            report.worker_id, report.iterations_completed, report.mismatches
        ))
            .worker(report)
            .log()
            .await;
    }

    /// Log a worker stopped by a transport error
    pub async fn log_worker_failed(&self, report: &WorkerReport, error: &AppError) {
        self.logger.error(&format!("Worker {} failed: {}", report.worker_id, error))
            .worker(report)
            .error_info(error)
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await;
    }

    /// Log a client accepted by the echo server
    pub async fn log_peer_connected(&self, peer: &str) {
        self.logger.info(&format!("connected with {}", peer))
            .field("peer", peer)
            .field("event", "connected")
            .log()
            .await;
    }

    /// Log a client that went away, with the bytes echoed back to it
    pub async fn log_peer_disconnected(&self, peer: &str, echoed: u64, error: Option<&AppError>) {
        match error {
            None => {
                self.logger.info(&format!("disconnected with {}", peer))
                    .field("peer", peer)
                    .field("event", "disconnected")
                    .field("bytes_echoed", echoed)
                    .log()
                    .await;
            }
            Some(err) => {
                self.logger.warn(&format!("disconnected with {}: {}", peer, err))
                    .field("peer", peer)
                    .field("event", "disconnected")
                    .field("bytes_echoed", echoed)
                    .error_info(err)
                    .log()
                    .await;
            }
        }
    }

    /// Log the aggregated outcome of a run
    pub async fn log_run_summary(&self, run: &RunReport) {
        let level = if run.is_success() { LogLevel::Info } else { LogLevel::Warn };
        self.logger.log(level, &format!(
            "Run finished: {} workers, {} iterations, {} mismatches, {} failed workers",
            run.outcomes.len(),
            run.iterations_completed(),
            run.failures,
            run.failed_workers()
        ))
            .field("workers", run.outcomes.len())
            .field("iterations", run.iterations_completed())
            .field("mismatches", run.failures)
            .field("failed_workers", run.failed_workers())
            .log()
            .await;
    }
}

/// Creates loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create the echo event logger
    pub async fn create_echo_logger(&self) -> EchoLogger {
        let echo = EchoLogger::new(&self.config);
        echo.logger.set_session_id(self.session_id.clone()).await;
        echo
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorPolicy;
    use std::str::FromStr;

    fn quiet_config() -> Config {
        Config {
            port: 9000,
            enable_color: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_level_follows_config() {
        let logger = Logger::with_config("TEST".to_string(), &quiet_config());
        assert_eq!(logger.min_level, LogLevel::Warn);
        assert_eq!(logger.format, LogFormat::Console);
        assert!(!logger.use_color);

        let verbose = Config { verbose: true, ..quiet_config() };
        let logger = Logger::with_config("TEST".to_string(), &verbose);
        assert_eq!(logger.min_level, LogLevel::Info);

        let debug = Config { debug: true, ..quiet_config() };
        let logger = Logger::with_config("TEST".to_string(), &debug);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
        assert!(logger.include_location);
    }

    #[tokio::test]
    async fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.min_level = LogLevel::Warn;

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[tokio::test]
    async fn test_session_and_context_fields() {
        let logger = Logger::new("TEST".to_string());
        logger.set_session_id("test-session".to_string()).await;
        logger.add_context_field("policy".to_string(), ErrorPolicy::Isolate).await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_deref(), Some("test-session"));
        assert_eq!(context.context_fields["policy"], serde_json::json!("isolate"));
    }

    #[tokio::test]
    async fn test_operation_correlation() {
        let mut logger = Logger::new("TEST".to_string());
        logger.min_level = LogLevel::Error;
        let correlation_id = logger.start_operation("echo_run").await;
        assert!(!correlation_id.is_empty());
        assert_eq!(
            logger.context.read().await.current_correlation_id.as_deref(),
            Some(correlation_id.as_str())
        );

        logger.end_operation(&correlation_id, "echo_run", true).await;
        assert!(logger.context.read().await.current_correlation_id.is_none());
    }

    #[test]
    fn test_log_formats() {
        let mut fields = HashMap::new();
        fields.insert("worker".to_string(), serde_json::json!(3));
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Worker 3 finished".to_string(),
            logger: "ECHO".to_string(),
            correlation_id: Some("0123456789abcdef".to_string()),
            fields,
            thread_id: None,
            location: None,
        };

        let mut logger = Logger::new("ECHO".to_string());
        logger.use_color = false;

        let console_output = logger.format_console(&entry);
        assert!(console_output.contains(" INFO [ECHO] Worker 3 finished"));
        assert!(console_output.contains("[01234567]"));
        assert!(console_output.contains("{worker=3}"));

        let json_output = logger.format_json(&entry);
        let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert_eq!(parsed["message"], "Worker 3 finished");
        assert_eq!(parsed["fields"]["worker"], 3);
    }

    #[test]
    fn test_worker_fields() {
        let logger = Logger::new("ECHO".to_string());
        let report = WorkerReport {
            worker_id: 2,
            iterations_completed: 10,
            mismatches: 1,
            bytes_sent: 160,
            bytes_received: 160,
        };

        let builder = logger.info("done").worker(&report);
        assert_eq!(builder.entry.fields["worker"], 2);
        assert_eq!(builder.entry.fields["mismatches"], 1);
        assert_eq!(builder.entry.fields["bytes_received"], 160);

        let builder = logger.error("failed").error_info(&AppError::read("closed"));
        assert_eq!(builder.entry.fields["error_category"], "READ");
        assert_eq!(builder.entry.fields["error_transport"], true);
    }

    #[tokio::test]
    async fn test_echo_logger_events() {
        let echo = EchoLogger::new(&quiet_config());
        let report = WorkerReport::new(0);
        let error = AppError::connection("127.0.0.1:9: refused");

        echo.log_connection(0, "127.0.0.1:9000", None).await;
        echo.log_connection(1, "127.0.0.1:9000", Some(&error)).await;
        echo.log_mismatch(0, 4, Some(17), 1024).await;
        echo.log_worker_finished(&report).await;
        echo.log_worker_failed(&report, &error).await;
        echo.log_run_summary(&RunReport::default()).await;
        echo.log_peer_connected("127.0.0.1:50000").await;
        echo.log_peer_disconnected("127.0.0.1:50000", 4096, None).await;
        echo.log_peer_disconnected("127.0.0.1:50001", 0, Some(&AppError::read("reset"))).await;
    }

    #[tokio::test]
    async fn test_logger_factory_shares_session() {
        let factory = LoggerFactory::new(quiet_config());
        let first = factory.create_echo_logger().await;
        let echo = factory.create_echo_logger().await;

        let session = factory.session_id().to_string();
        assert!(!session.is_empty());
        assert_eq!(first.logger().context.read().await.session_id.as_deref(), Some(session.as_str()));
        assert_eq!(echo.logger().context.read().await.session_id.as_deref(), Some(session.as_str()));
        assert_eq!(echo.logger().name, "ECHO");
    }

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "Test".to_string(),
            logger: "TEST".to_string(),
            correlation_id: None,
            fields: HashMap::new(),
            thread_id: None,
            location: Some(LogLocation {
                file: "worker.rs".to_string(),
                line: 42,
                module: None,
            }),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: LogEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.level, LogLevel::Warn);
        assert_eq!(deserialized.message, "Test");
        assert_eq!(deserialized.location.unwrap().line, 42);
    }
}
