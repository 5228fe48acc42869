//! Harness error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Could not connect to emulator at {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Emulator at {endpoint} is not healthy after {attempts} connection attempt(s)")]
    EmulatorNotHealthy { endpoint: String, attempts: usize },

    #[error("Emulator request '{operation}' failed: {message}")]
    Request { operation: String, message: String },

    #[error("Emulator request '{operation}' returned HTTP {status}")]
    UnexpectedStatus { operation: String, status: u16 },

    #[error("Invalid health report from emulator: {message}")]
    InvalidHealthReport { message: String },

    #[error("Metrics reset failed: {message}")]
    MetricsResetFailed { message: String },

    #[error("{launcher} launcher failed: {message}")]
    LauncherFailed { launcher: String, message: String },

    #[error("Command '{command}' exited with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Test inventory error: {message}")]
    Inventory { message: String },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report write error: {0}")]
    Report(#[from] csv::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl HarnessError {
    pub fn config<S: Into<String>>(field: S) -> Self {
        HarnessError::Configuration { field: field.into() }
    }

    pub fn launcher<L: Into<String>, M: Into<String>>(launcher: L, message: M) -> Self {
        HarnessError::LauncherFailed {
            launcher: launcher.into(),
            message: message.into(),
        }
    }

    pub fn inventory<S: Into<String>>(message: S) -> Self {
        HarnessError::Inventory {
            message: message.into(),
        }
    }

    /// Map a transport error from `reqwest`, separating connection failures
    /// (which the prober retries) from everything else
    pub fn from_request(operation: &str, url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            HarnessError::Connection {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            HarnessError::Request {
                operation: operation.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, HarnessError::Connection { .. })
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_classification() {
        let err = HarnessError::Connection {
            url: "http://localhost:4566".to_string(),
            message: "refused".to_string(),
        };
        assert!(err.is_connection());
        assert!(!HarnessError::config("endpoint").is_connection());
    }

    #[test]
    fn test_messages_name_the_failing_call() {
        let err = HarnessError::UnexpectedStatus {
            operation: "metrics reset".to_string(),
            status: 500,
        };
        assert_eq!(err.to_string(), "Emulator request 'metrics reset' returned HTTP 500");
    }
}
