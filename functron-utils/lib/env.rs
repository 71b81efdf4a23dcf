//! Utility functions for working with environment variables.

use std::time::Duration;

use crate::DEFAULT_ENDPOINT_URL;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Environment variable for the functron endpoint URL
pub const FUNCTRON_URL_ENV_VAR: &str = "FUNCTRON_URL";

/// Environment variable for the remote execution timeout, in seconds
pub const FUNCTRON_TIMEOUT_ENV_VAR: &str = "FUNCTRON_TIMEOUT";

/// Environment variable for the HTTP transport deadline, in seconds
pub const FUNCTRON_HTTP_TIMEOUT_ENV_VAR: &str = "FUNCTRON_HTTP_TIMEOUT";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the endpoint URL invocations are posted to.
/// If the FUNCTRON_URL environment variable is set, returns that value.
/// Otherwise, returns the default endpoint URL.
pub fn get_endpoint_url() -> String {
    match std::env::var(FUNCTRON_URL_ENV_VAR) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_ENDPOINT_URL.to_string(),
    }
}

/// Returns the raw FUNCTRON_TIMEOUT value, if set.
///
/// The value is returned unparsed so the caller can validate it as a remote execution timeout.
pub fn get_timeout_var() -> Option<String> {
    std::env::var(FUNCTRON_TIMEOUT_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Returns the HTTP transport deadline from FUNCTRON_HTTP_TIMEOUT, if set to a positive number
/// of seconds. Unparseable values are ignored with a warning.
pub fn get_http_timeout() -> Option<Duration> {
    let raw = std::env::var(FUNCTRON_HTTP_TIMEOUT_ENV_VAR).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            tracing::warn!(
                "ignoring {}={:?}: expected a positive number of seconds",
                FUNCTRON_HTTP_TIMEOUT_ENV_VAR,
                raw
            );
            None
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
