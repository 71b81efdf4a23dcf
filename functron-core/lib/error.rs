use thiserror::Error;

use crate::invocation::TimeoutError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a functron-related operation.
pub type FunctronResult<T> = Result<T, FunctronError>;

/// An error that occurred while building, sending or decoding an invocation.
#[derive(pretty_error_debug::Debug, Error)]
pub enum FunctronError {
    /// The timeout value was rejected.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(#[from] TimeoutError),

    /// Files were added after the build context archive was sealed.
    #[error("build context archive is sealed; no more files can be added")]
    ArchiveSealed,

    /// Finishing the build context archive failed earlier, so its contents cannot be used.
    #[error("build context archive could not be finished and is incomplete")]
    ArchiveIncomplete,

    /// A local file could not be read or the archive could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request could not be completed.
    #[error("request to functron server failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status and a body that is not an invocation result.
    #[error("functron server responded with status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,

        /// The response body, as text.
        body: String,
    },

    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body is JSON but not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// A required key is absent from the response.
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    /// A response field holds a value of the wrong JSON type.
    #[error("response field `{field}` is not {expected}")]
    InvalidFieldType {
        /// The field name.
        field: &'static str,

        /// What the field should have held.
        expected: &'static str,
    },

    /// A response field that should hold base64 does not.
    #[error("response field `{field}` is not valid base64: {source}")]
    InvalidBase64 {
        /// The field name.
        field: &'static str,

        /// The underlying decode error.
        #[source]
        source: base64::DecodeError,
    },
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl FunctronError {
    /// Whether the error comes from an invalid input value.
    pub fn is_validation(&self) -> bool {
        matches!(self, FunctronError::InvalidTimeout(_))
    }

    /// Whether the error comes from using the invocation in the wrong state.
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            FunctronError::ArchiveSealed | FunctronError::ArchiveIncomplete
        )
    }

    /// Whether the error comes from the HTTP transport.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FunctronError::Network(_) | FunctronError::UnexpectedStatus { .. }
        )
    }

    /// Whether the error comes from a malformed or incomplete server response.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            FunctronError::Json(_)
                | FunctronError::NotAnObject
                | FunctronError::MissingField(_)
                | FunctronError::InvalidFieldType { .. }
                | FunctronError::InvalidBase64 { .. }
        )
    }
}
