//! HTTP transport for functron invocations.
//!
//! Each invocation is a single POST of an [`InvocationRequest`] to the server. There are no
//! retries; transport failures and undecodable replies are returned to the caller as they are.

use std::time::Duration;

use functron_utils::env;
use getset::Getters;
use reqwest::StatusCode;
use typed_builder::TypedBuilder;

use crate::{FunctronError, FunctronResult, InvocationRequest, InvocationResponse};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Options for connecting to a functron server.
///
/// The timeouts here bound the HTTP exchange only. How long the function may run on the server
/// is set per invocation.
#[derive(Debug, Clone, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ClientOptions {
    /// URL invocations are posted to
    #[builder(setter(into))]
    endpoint: String,

    /// Deadline for establishing the connection
    #[builder(default, setter(strip_option))]
    connect_timeout: Option<Duration>,

    /// Deadline for the whole request, from connecting until the body has been read
    #[builder(default, setter(strip_option))]
    request_timeout: Option<Duration>,
}

/// Posts invocations to a functron server.
#[derive(Debug, Clone)]
pub struct FunctronClient {
    client: reqwest::Client,
    endpoint: String,
}

/// Blocking counterpart of [`FunctronClient`].
///
/// Must not be used from within an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingFunctronClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ClientOptions {
    /// Reads the endpoint from FUNCTRON_URL and the request deadline from
    /// FUNCTRON_HTTP_TIMEOUT, falling back to the defaults.
    pub fn from_env() -> Self {
        Self {
            endpoint: env::get_endpoint_url(),
            connect_timeout: None,
            request_timeout: env::get_http_timeout(),
        }
    }
}

impl FunctronClient {
    /// Creates a client for `endpoint` with no transport deadlines.
    pub fn new(endpoint: &str) -> FunctronResult<Self> {
        Self::with_options(&ClientOptions::builder().endpoint(endpoint).build())
    }

    /// Creates a client from `options`.
    pub fn with_options(options: &ClientOptions) -> FunctronResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: options.endpoint.clone(),
        })
    }

    /// The URL invocations are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `request` and decodes the server's reply.
    pub async fn send(&self, request: &InvocationRequest) -> FunctronResult<InvocationResponse> {
        tracing::info!("invoking function {} at {}", request.fn_name, self.endpoint);

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!("received {} bytes with status {}", body.len(), status);
        decode_body(status, &body)
    }
}

impl BlockingFunctronClient {
    /// Creates a client for `endpoint` with no transport deadlines.
    pub fn new(endpoint: &str) -> FunctronResult<Self> {
        Self::with_options(&ClientOptions::builder().endpoint(endpoint).build())
    }

    /// Creates a client from `options`.
    pub fn with_options(options: &ClientOptions) -> FunctronResult<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: options.endpoint.clone(),
        })
    }

    /// The URL invocations are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `request` and decodes the server's reply.
    pub fn send(&self, request: &InvocationRequest) -> FunctronResult<InvocationResponse> {
        tracing::info!("invoking function {} at {}", request.fn_name, self.endpoint);

        let response = self.client.post(&self.endpoint).json(request).send()?;
        let status = response.status();
        let body = response.bytes()?;

        tracing::debug!("received {} bytes with status {}", body.len(), status);
        decode_body(status, &body)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

/// Decodes a reply body.
///
/// The server reports build failures with a 400 and a complete result body, so a non-success
/// status is only an error when the body is not a result.
fn decode_body(status: StatusCode, body: &[u8]) -> FunctronResult<InvocationResponse> {
    if status.is_success() {
        return InvocationResponse::from_slice(body);
    }

    match InvocationResponse::from_slice(body) {
        Ok(response) => {
            tracing::warn!(
                "functron server responded with status {}: {:?}",
                status,
                response.get_errors()
            );
            Ok(response)
        }
        Err(e) => {
            tracing::debug!("could not decode body of {} response: {}", status, e);
            Err(FunctronError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(body).into_owned(),
            })
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
