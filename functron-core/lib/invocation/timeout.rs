//! The remote execution timeout carried in each invocation.

use std::{fmt, str::FromStr};

use functron_utils::DEFAULT_TIMEOUT_SECS;
use serde::Serialize;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How long, in seconds, the server lets the function run.
///
/// The client never enforces this value itself; it is only sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Timeout(f64);

/// Why a timeout value was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeoutError {
    /// The value is zero or negative.
    #[error("timeout should be greater than 0, got {0}")]
    NotPositive(f64),

    /// The value is not a finite number.
    #[error("timeout must be a number of seconds, got {0:?}")]
    NotNumeric(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Timeout {
    /// Creates a timeout of `secs` seconds.
    pub fn new(secs: f64) -> Result<Self, TimeoutError> {
        if !secs.is_finite() {
            return Err(TimeoutError::NotNumeric(secs.to_string()));
        }

        if secs <= 0.0 {
            return Err(TimeoutError::NotPositive(secs));
        }

        Ok(Self(secs))
    }

    /// The timeout in seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for Timeout {
    fn default() -> Self {
        Self(DEFAULT_TIMEOUT_SECS)
    }
}

impl TryFrom<f64> for Timeout {
    type Error = TimeoutError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        Self::new(secs)
    }
}

impl FromStr for Timeout {
    type Err = TimeoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = s
            .trim()
            .parse::<f64>()
            .map_err(|_| TimeoutError::NotNumeric(s.to_string()))?;

        Self::new(secs)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
