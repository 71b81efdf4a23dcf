//! Stdout/stderr pairs decoded from a functron response.

use std::borrow::Cow;

use base64::{prelude::BASE64_STANDARD, Engine};
use getset::Getters;
use serde_json::{Map, Value};

use crate::{FunctronError, FunctronResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Keys and decode flags for the build context output.
pub(crate) const BUILD_CONTEXT_PAIR: PairSpec = PairSpec {
    stderr_key: "BuildContextStderr",
    stdout_key: "BuildContextStdout",
    decode_stderr: true,
    decode_stdout: true,
};

/// Keys and decode flags for the command output. `CmdErr` arrives as plain text.
pub(crate) const CMD_PAIR: PairSpec = PairSpec {
    stderr_key: "CmdErr",
    stdout_key: "CmdOut",
    decode_stderr: false,
    decode_stdout: true,
};

/// Keys and decode flags for the cleanup output.
pub(crate) const CLEANUP_PAIR: PairSpec = PairSpec {
    stderr_key: "CleanupErr",
    stdout_key: "CleanupOut",
    decode_stderr: true,
    decode_stdout: true,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A single non-empty output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    /// Bytes decoded from base64
    Bytes(Vec<u8>),

    /// Text passed through as the server sent it
    Text(String),
}

/// The standard error and standard output of one phase of an invocation.
///
/// `None` means the server sent nothing for that stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ValuePair {
    /// Standard error
    stderr: Option<OutputValue>,

    /// Standard output
    stdout: Option<OutputValue>,
}

/// Where to find a pair in the response and how to decode each side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PairSpec {
    pub(crate) stderr_key: &'static str,
    pub(crate) stdout_key: &'static str,
    pub(crate) decode_stderr: bool,
    pub(crate) decode_stdout: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OutputValue {
    /// The raw bytes of the value.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutputValue::Bytes(bytes) => bytes,
            OutputValue::Text(text) => text.as_bytes(),
        }
    }

    /// The value as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match self {
            OutputValue::Bytes(bytes) => String::from_utf8_lossy(bytes),
            OutputValue::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl ValuePair {
    /// Creates a pair from already decoded values.
    pub fn new(stderr: Option<OutputValue>, stdout: Option<OutputValue>) -> Self {
        Self { stderr, stdout }
    }

    /// Whether neither stream produced output.
    pub fn is_empty(&self) -> bool {
        self.stderr.is_none() && self.stdout.is_none()
    }

    /// Looks up both keys of `spec` in `object` and decodes them.
    pub(crate) fn from_json(object: &Map<String, Value>, spec: &PairSpec) -> FunctronResult<Self> {
        let stderr = decode_field(object, spec.stderr_key, spec.decode_stderr)?;
        let stdout = decode_field(object, spec.stdout_key, spec.decode_stdout)?;
        Ok(Self { stderr, stdout })
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

/// Decodes one output field.
///
/// An empty string or `null` is the absent marker whatever `decode` says.
fn decode_field(
    object: &Map<String, Value>,
    key: &'static str,
    decode: bool,
) -> FunctronResult<Option<OutputValue>> {
    let value = object.get(key).ok_or(FunctronError::MissingField(key))?;
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(text) => text,
        _ => {
            return Err(FunctronError::InvalidFieldType {
                field: key,
                expected: "a string",
            })
        }
    };

    if text.is_empty() {
        return Ok(None);
    }

    if !decode {
        return Ok(Some(OutputValue::Text(text.clone())));
    }

    BASE64_STANDARD
        .decode(text)
        .map(|bytes| Some(OutputValue::Bytes(bytes)))
        .map_err(|source| FunctronError::InvalidBase64 { field: key, source })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
