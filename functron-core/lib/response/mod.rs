//! Decoding of functron server responses.
//!
//! The server replies with a flat JSON object. Each phase of an invocation (building the
//! context, running the command, cleaning up) contributes an error key and an output key,
//! most of them base64 encoded. This module turns that object into an [`InvocationResponse`].

mod value_pair;

use std::fmt;

use getset::Getters;
use serde_json::{Map, Value};

use crate::{FunctronError, FunctronResult};

use value_pair::{BUILD_CONTEXT_PAIR, CLEANUP_PAIR, CMD_PAIR};

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use value_pair::{OutputValue, ValuePair};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const ERRORS_KEY: &str = "Errors";
const TEMP_NAME_KEY: &str = "TempName";
const DETAILED_ERROR_KEY: &str = "DetailedError";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The decoded result of one invocation.
///
/// Remote failures are reported here rather than as errors: check [`has_errors`] and the
/// `stderr` side of each pair.
///
/// [`has_errors`]: InvocationResponse::has_errors
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct InvocationResponse {
    /// Errors reported by the server, in order
    errors: Vec<String>,

    /// Output of building the image from the build context
    build_output: ValuePair,

    /// Output of running the function
    cmd_output: ValuePair,

    /// Output of removing the image
    cleanup_output: ValuePair,

    /// The temporary image tag the server built, when reported
    temp_name: Option<String>,

    /// The server's detailed build error, when reported
    detailed_error: Option<String>,

    /// The response exactly as received
    raw: Value,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl InvocationResponse {
    /// Decodes a response from its JSON value.
    pub fn from_json(raw: Value) -> FunctronResult<Self> {
        let object = raw.as_object().ok_or(FunctronError::NotAnObject)?;

        let errors = decode_errors(object)?;
        let build_output = ValuePair::from_json(object, &BUILD_CONTEXT_PAIR)?;
        let cmd_output = ValuePair::from_json(object, &CMD_PAIR)?;
        let cleanup_output = ValuePair::from_json(object, &CLEANUP_PAIR)?;
        let temp_name = optional_string(object, TEMP_NAME_KEY);
        let detailed_error = optional_string(object, DETAILED_ERROR_KEY);

        tracing::debug!(
            "decoded response: {} errors, build stderr {}, cmd stderr {}",
            errors.len(),
            build_output.get_stderr().is_some(),
            cmd_output.get_stderr().is_some()
        );

        Ok(Self {
            errors,
            build_output,
            cmd_output,
            cleanup_output,
            temp_name,
            detailed_error,
            raw,
        })
    }

    /// Decodes a response from raw JSON bytes.
    pub fn from_slice(body: &[u8]) -> FunctronResult<Self> {
        Self::from_json(serde_json::from_slice(body)?)
    }

    /// Whether the server reported any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the function built and ran without the server reporting a problem.
    pub fn is_success(&self) -> bool {
        !self.has_errors()
            && self.build_output.get_stderr().is_none()
            && self.cmd_output.get_stderr().is_none()
            && self.cleanup_output.get_stderr().is_none()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Display for InvocationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.raw).map_err(|_| fmt::Error)?;
        write!(f, "FunctronResponse({})", json)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

/// Reads the error list. The server sends an array, a lone string on some early exits, or null.
fn decode_errors(object: &Map<String, Value>) -> FunctronResult<Vec<String>> {
    let invalid = || FunctronError::InvalidFieldType {
        field: ERRORS_KEY,
        expected: "a list of strings",
    };

    match object.get(ERRORS_KEY) {
        None => Err(FunctronError::MissingField(ERRORS_KEY)),
        Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(error)) => Ok(vec![error.clone()]),
        Some(Value::Array(errors)) => errors
            .iter()
            .map(|error| error.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
