//! Invocation building for the functron client.
//!
//! An [`Invocation`] gathers everything the server needs to build and run a function:
//! - The function name
//! - The Dockerfile text
//! - A tar archive of build context files
//! - Optional standard input
//! - The remote execution timeout
//!
//! It then serializes them into a single [`InvocationRequest`] and posts it to the server.

mod archive;
mod request;
mod timeout;

use std::{fs, path::Path};

use base64::{prelude::BASE64_STANDARD, Engine};
use getset::Getters;

use crate::{
    client::{BlockingFunctronClient, FunctronClient},
    FunctronResult, InvocationResponse,
};

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use archive::*;
pub use request::*;
pub use timeout::*;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A single function invocation and the build context that goes with it.
///
/// An invocation is meant to be used once. Its archive is sealed the first time the request
/// payload is built, and its temporary backing file is removed when the invocation is dropped.
///
/// ## Examples
///
/// ```no_run
/// use functron_core::Invocation;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let mut invocation = Invocation::new("hello-world")?;
/// invocation.set_dockerfile("functions/hello/Dockerfile")?;
/// invocation.add_files("functions/hello", "")?;
///
/// let response = invocation
///     .invoke("http://localhost:8081/", Some(&b"Functron User!"[..]), Some(1.0))
///     .await?;
/// println!("{}", response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Getters)]
pub struct Invocation {
    /// Name of the function to invoke
    #[getset(get = "pub with_prefix")]
    name: String,

    /// Dockerfile text
    #[getset(get = "pub with_prefix")]
    dockerfile: Option<String>,

    /// Build context files
    archive: BuildContext,

    /// Raw standard input, encoded when the payload is built
    #[getset(get = "pub with_prefix")]
    stdin: Option<Vec<u8>>,

    /// Seconds the server lets the function run
    #[getset(get = "pub with_prefix")]
    timeout: Timeout,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Invocation {
    /// Creates an invocation of the function `name` with the default timeout.
    pub fn new(name: impl Into<String>) -> FunctronResult<Self> {
        Ok(Self {
            name: name.into(),
            dockerfile: None,
            archive: BuildContext::new()?,
            stdin: None,
            timeout: Timeout::default(),
        })
    }

    /// Creates an invocation of the function `name` with a timeout of `secs` seconds.
    pub fn with_timeout(name: impl Into<String>, secs: f64) -> FunctronResult<Self> {
        let timeout = Timeout::new(secs)?;
        let mut invocation = Self::new(name)?;
        invocation.timeout = timeout;
        Ok(invocation)
    }

    /// Reads the Dockerfile at `path`. The contents are not checked.
    pub fn set_dockerfile(&mut self, path: impl AsRef<Path>) -> FunctronResult<()> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        tracing::debug!("read dockerfile {} ({} bytes)", path.display(), contents.len());
        self.dockerfile = Some(contents);
        Ok(())
    }

    /// Sets the Dockerfile text directly.
    pub fn set_dockerfile_contents(&mut self, contents: impl Into<String>) {
        self.dockerfile = Some(contents.into());
    }

    /// Adds a file or directory to the build context.
    ///
    /// Directories are added recursively. With an empty `archive_name` a directory's contents
    /// land at the root of the build context and a file keeps its own name.
    /// Fails with [`FunctronError::ArchiveSealed`](crate::FunctronError::ArchiveSealed) once the
    /// request payload has been built.
    pub fn add_files(&mut self, path: impl AsRef<Path>, archive_name: &str) -> FunctronResult<()> {
        self.archive.append(path, archive_name)
    }

    /// Sets the standard input passed to the function.
    pub fn set_stdin(&mut self, stdin: &[u8]) {
        self.stdin = Some(stdin.to_vec());
    }

    /// Sets the remote execution timeout in seconds.
    ///
    /// `None` leaves the current value in place, as does a rejected value.
    pub fn set_timeout(&mut self, secs: Option<f64>) -> FunctronResult<()> {
        if let Some(secs) = secs {
            self.timeout = Timeout::new(secs)?;
        }

        Ok(())
    }

    /// Whether the build context has been sealed.
    pub fn is_sealed(&self) -> bool {
        self.archive.is_sealed()
    }

    /// Builds the request payload, sealing the build context if it is still open.
    ///
    /// Calling this again returns the same payload.
    pub fn to_request_payload(&mut self) -> FunctronResult<InvocationRequest> {
        let archive = self.archive.to_bytes()?;
        let tar_file = BASE64_STANDARD.encode(&archive);
        let stdin = self
            .stdin
            .as_deref()
            .map(|stdin| BASE64_STANDARD.encode(stdin))
            .unwrap_or_default();

        tracing::debug!(
            "built payload for {}: archive {} bytes, stdin {} bytes, timeout {}",
            self.name,
            archive.len(),
            self.stdin.as_ref().map_or(0, Vec::len),
            self.timeout
        );

        Ok(InvocationRequest::new(
            self.name.clone(),
            self.dockerfile.clone(),
            tar_file,
            stdin,
            self.timeout,
        ))
    }

    /// Builds the request payload as a JSON value.
    pub fn to_json(&mut self) -> FunctronResult<serde_json::Value> {
        Ok(serde_json::to_value(self.to_request_payload()?)?)
    }

    /// Posts the invocation to `url` and decodes the result.
    ///
    /// `stdin` and `timeout` override the values set earlier when given.
    pub async fn invoke(
        &mut self,
        url: &str,
        stdin: Option<&[u8]>,
        timeout: Option<f64>,
    ) -> FunctronResult<InvocationResponse> {
        self.invoke_with(&FunctronClient::new(url)?, stdin, timeout).await
    }

    /// Like [`Invocation::invoke`], posting through an already configured client.
    pub async fn invoke_with(
        &mut self,
        client: &FunctronClient,
        stdin: Option<&[u8]>,
        timeout: Option<f64>,
    ) -> FunctronResult<InvocationResponse> {
        self.apply_overrides(stdin, timeout)?;
        let request = self.to_request_payload()?;
        client.send(&request).await
    }

    /// Blocking form of [`Invocation::invoke`].
    ///
    /// Must not be called from within an async runtime.
    pub fn invoke_blocking(
        &mut self,
        url: &str,
        stdin: Option<&[u8]>,
        timeout: Option<f64>,
    ) -> FunctronResult<InvocationResponse> {
        self.invoke_blocking_with(&BlockingFunctronClient::new(url)?, stdin, timeout)
    }

    /// Like [`Invocation::invoke_blocking`], posting through an already configured client.
    pub fn invoke_blocking_with(
        &mut self,
        client: &BlockingFunctronClient,
        stdin: Option<&[u8]>,
        timeout: Option<f64>,
    ) -> FunctronResult<InvocationResponse> {
        self.apply_overrides(stdin, timeout)?;
        let request = self.to_request_payload()?;
        client.send(&request)
    }

    fn apply_overrides(
        &mut self,
        stdin: Option<&[u8]>,
        timeout: Option<f64>,
    ) -> FunctronResult<()> {
        self.set_timeout(timeout)?;

        if let Some(stdin) = stdin.filter(|stdin| !stdin.is_empty()) {
            self.set_stdin(stdin);
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
