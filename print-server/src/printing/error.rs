//! Print error taxonomy

use thiserror::Error;

use super::types::TicketType;

/// Errors a print request or job can end with
///
/// Only `Validation` is returned from a submit call. The others are
/// per-job outcomes, logged and reported on the job receipt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("Invalid print request: {0}")]
    Validation(String),

    #[error("Printer {0} is not connected or not active")]
    PrinterUnavailable(String),

    #[error("Printing on {printer} failed: {message}")]
    DispatchFailure { printer: String, message: String },

    #[error("Ticket could not be rendered: {0}")]
    RenderFailure(String),
}

pub type PrintResult<T> = Result<T, PrintError>;

/// Rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{ticket_type} ticket cannot be rendered from a {payload} payload")]
    PayloadMismatch {
        ticket_type: TicketType,
        payload: &'static str,
    },
}

impl From<RenderError> for PrintError {
    fn from(e: RenderError) -> Self {
        PrintError::RenderFailure(e.to_string())
    }
}
