//! `functron-cli` is the command-line client for invoking functions on a functron server.

#![warn(missing_docs)]

mod args;
mod error;
mod styles;

pub mod handlers;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use args::*;
pub use error::*;
pub use styles::*;
