use functron_core::{FunctronError, TimeoutError};
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a functron CLI operation.
pub type FunctronCliResult<T> = Result<T, FunctronCliError>;

/// An error that occurred while running the functron CLI.
#[derive(pretty_error_debug::Debug, Error)]
pub enum FunctronCliError {
    /// An error from building, sending or decoding the invocation.
    #[error(transparent)]
    Functron(#[from] FunctronError),

    /// An error reading local input.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be printed as JSON.
    #[error("could not render response: {0}")]
    Json(#[from] serde_json::Error),

    /// The timeout in the environment is not usable.
    #[error("invalid FUNCTRON_TIMEOUT: {0}")]
    InvalidTimeoutVar(#[source] TimeoutError),
}
