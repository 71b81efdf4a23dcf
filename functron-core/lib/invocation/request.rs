//! The JSON body posted to the functron server.

use serde::{Deserialize, Serialize};

use super::Timeout;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Request payload for invoking a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    /// Name of the function to invoke
    pub fn_name: String,

    /// Dockerfile text, or `null` when none was set
    pub docker_file: Option<String>,

    /// Base64 of the uncompressed tar build context
    pub tar_file: String,

    /// Base64 of the standard input, empty when unset
    pub stdin: String,

    /// Seconds the server lets the function run
    pub timeout: f64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl InvocationRequest {
    pub(crate) fn new(
        fn_name: String,
        docker_file: Option<String>,
        tar_file: String,
        stdin: String,
        timeout: Timeout,
    ) -> Self {
        Self {
            fn_name,
            docker_file,
            tar_file,
            stdin,
            timeout: timeout.as_secs_f64(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
