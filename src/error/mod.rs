//! Error handling for the echo tester and HTTP probe

use thiserror::Error;

/// Custom error types for the echo tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing configuration, detected before any work starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Opening the connection to the echo server failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Sending a payload failed
    #[error("Write error: {0}")]
    Write(String),

    /// Receiving the echoed payload failed or the peer closed early
    #[error("Read error: {0}")]
    Read(String),

    /// HTTP probe request or body errors
    #[error("HTTP request error: {0}")]
    Http(String),

    /// I/O errors outside the echo transport (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (integers, URLs, booleans)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// The run finished but some workers failed
    #[error("Test execution error: {0}")]
    TestExecution(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new write error
    pub fn write<S: Into<String>>(message: S) -> Self {
        Self::Write(message.into())
    }

    /// Create a new read error
    pub fn read<S: Into<String>>(message: S) -> Self {
        Self::Read(message.into())
    }

    /// Create a new HTTP error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new test execution error
    pub fn test_execution<S: Into<String>>(message: S) -> Self {
        Self::TestExecution(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Connection(_) => "CONNECT",
            Self::Write(_) => "WRITE",
            Self::Read(_) => "READ",
            Self::Http(_) => "HTTP",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::TestExecution(_) => "TEST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the error came from the echo transport of a worker
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Write(_) | Self::Read(_))
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments (--port is required).", msg)
            }
            Self::Connection(msg) => {
                format!("Could not connect to the echo server: {}\n\nSuggestion: Make sure the server is running and listening on the given --ip and --port.", msg)
            }
            Self::Write(msg) => {
                format!("Sending the payload failed: {}\n\nSuggestion: The server probably closed the connection. Check the server logs.", msg)
            }
            Self::Read(msg) => {
                format!("Receiving the echo failed: {}\n\nSuggestion: The server closed the connection or echoed fewer bytes than it received.", msg)
            }
            Self::Http(msg) => {
                format!("HTTP request failed: {}\n\nSuggestion: Make sure the HTTP server is running and the URL is correct.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse input: {}\n\nSuggestion: Check the format of your command line arguments and environment variables.", msg)
            }
            Self::TestExecution(msg) => {
                format!("Test execution failed: {}\n\nSuggestion: Inspect the failed workers listed above; the server likely dropped connections.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Connection(_) | Self::Write(_) | Self::Read(_) | Self::Http(_) => 2,
            Self::Io(_) => 5,
            Self::TestExecution(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Connection(_) | Self::Write(_) | Self::Read(_) | Self::Http(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::TestExecution(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::http(format!("connection failed: {}", error))
        } else {
            Self::http(error.to_string())
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_panic() {
            Self::internal(format!("worker task panicked: {}", error))
        } else {
            Self::internal(format!("worker task cancelled: {}", error))
        }
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());
        }
    }

    /// Get formatted error summary grouped by category
    pub fn format_error_summary(&self, errors: &[&AppError]) -> String {
        if errors.is_empty() {
            return "No errors".to_string();
        }

        let mut summary = format!("Found {} error(s):", errors.len());

        // BTreeMap keeps the category order stable between runs
        let mut error_groups: std::collections::BTreeMap<&'static str, Vec<&AppError>> =
            std::collections::BTreeMap::new();
        for error in errors {
            error_groups.entry(error.category()).or_default().push(error);
        }

        for (category, group_errors) in error_groups {
            summary.push_str(&format!("\n  {}: {} error(s)", category, group_errors.len()));
            if self.verbose {
                for error in group_errors {
                    summary.push_str(&format!("\n    - {}", error));
                }
            }
        }

        summary
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("port is required");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_transport());
        assert_eq!(config_error.exit_code(), 1);

        let read_error = AppError::read("connection closed");
        assert_eq!(read_error.category(), "READ");
        assert!(read_error.is_transport());
        assert_eq!(read_error.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::config("invalid port");
        let display = error.to_string();
        assert!(display.contains("Configuration error"));
        assert!(display.contains("invalid port"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::connection("connect"),
            AppError::write("write"),
            AppError::read("read"),
            AppError::http("http"),
            AppError::io("io"),
            AppError::parse("parse"),
            AppError::test_execution("test"),
            AppError::internal("internal"),
        ];

        let expected_categories = [
            "CONFIG", "CONNECT", "WRITE", "READ", "HTTP", "IO", "PARSE", "TEST", "INTERNAL",
        ];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_transport_errors() {
        assert!(AppError::connection("test").is_transport());
        assert!(AppError::write("test").is_transport());
        assert!(AppError::read("test").is_transport());

        assert!(!AppError::http("test").is_transport());
        assert!(!AppError::io("test").is_transport());
        assert!(!AppError::parse("test").is_transport());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::parse("test").exit_code(), 1);
        assert_eq!(AppError::connection("test").exit_code(), 2);
        assert_eq!(AppError::http("test").exit_code(), 2);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::test_execution("test").exit_code(), 6);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::config("invalid port: 0");
        let message = error.user_friendly_message();
        assert!(message.contains("Configuration problem"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("invalid port: 0"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<u16>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let bool_error = "maybe".parse::<bool>().unwrap_err();
        let app_error: AppError = bool_error.into();
        assert!(app_error.to_string().contains("Boolean parse error"));
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let url_error = url::Url::parse("not-a-valid-url").unwrap_err();
        let app_error: AppError = url_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("URL parse error"));
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
        assert!(app_error.to_string().contains("Environment file error"));
    }

    #[tokio::test]
    async fn test_join_error_conversion() {
        let handle = tokio::spawn(async {
            panic!("boom");
        });
        let join_error = handle.await.unwrap_err();
        let app_error: AppError = join_error.into();
        assert_eq!(app_error.category(), "INTERNAL");
        assert!(app_error.to_string().contains("panicked"));
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("unexpected state");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");

        let app_error = AppError::config("bad port");
        let anyhow_error = anyhow::anyhow!(app_error);
        assert!(anyhow_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::connection("refused");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert_eq!(formatted_no_color, "[CONNECT] Connection error: refused");
        assert!(formatted_color.contains("CONNECT"));
        assert!(formatted_color.contains("refused"));
    }

    #[test]
    fn test_error_summary_groups_by_category() {
        let reporter = ErrorReporter::new(false, true);
        let first = AppError::read("worker 1: closed after 10 of 1024 bytes");
        let second = AppError::connection("worker 2: refused");
        let third = AppError::read("worker 3: reset");
        let errors = vec![&first, &second, &third];

        let summary = reporter.format_error_summary(&errors);
        assert!(summary.contains("Found 3 error(s)"));
        assert!(summary.contains("READ: 2 error(s)"));
        assert!(summary.contains("CONNECT: 1 error(s)"));
        assert!(summary.contains("worker 2: refused"));
        // CONNECT sorts before READ
        assert!(summary.find("CONNECT").unwrap() < summary.find("READ").unwrap());
    }

    #[test]
    fn test_empty_error_summary() {
        let reporter = ErrorReporter::new(false, false);
        assert_eq!(reporter.format_error_summary(&[]), "No errors");
    }

    #[test]
    fn test_error_reporter_default() {
        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }
}
