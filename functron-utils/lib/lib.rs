//! `functron-utils` is a library containing general utilities for the functron client.

#![warn(missing_docs)]

pub mod defaults;
pub mod env;
pub mod term;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use term::*;
