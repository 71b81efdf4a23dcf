//! Default values shared by the functron crates.

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The remote execution timeout, in seconds, used when none is given.
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// The endpoint invocations are posted to when none is given. The functron server listens on
/// port 8081 by default.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8081/";
