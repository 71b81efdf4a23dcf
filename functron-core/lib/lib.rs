//! `functron-core` is the client library for functron, a minimal Function-as-a-Service runtime.
//!
//! # Overview
//!
//! A functron server builds a Docker image from a Dockerfile and a build context, runs it once
//! with the given standard input, then removes the image. This crate is the client side of that
//! exchange:
//!
//! - Packaging build context files into an uncompressed tar archive
//! - Serializing the function name, Dockerfile, archive, stdin and timeout into one JSON request
//! - Posting the request to the server over HTTP
//! - Decoding the server's reply into per-phase stdout/stderr pairs
//!
//! The server does all building, running and cleanup; this crate never interprets the outputs
//! beyond decoding them.
//!
//! # Modules
//!
//! - [`invocation`] - Building invocations and their request payloads
//! - [`response`] - Decoding server responses
//! - [`client`] - HTTP transport

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod client;
pub mod invocation;
pub mod response;

pub use client::*;
pub use error::*;
pub use invocation::*;
pub use response::*;
