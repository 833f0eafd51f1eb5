//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// The spooler does not know this printer
    #[error("Printer not found: {0}")]
    NotFound(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A spooler command exited unsuccessfully
    #[error("Spooler command `{command}` failed: {message}")]
    Spooler { command: String, message: String },

    /// Printing is not available on this platform
    #[error("Printing not supported on this platform")]
    Unsupported,

    /// Windows-specific printing error
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),
}

/// Result type for printer operations
pub type PrinterResult<T> = Result<T, PrinterError>;
