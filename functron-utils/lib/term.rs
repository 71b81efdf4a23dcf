//! Terminal glyphs used when reporting invocation results.

use std::sync::LazyLock;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// A green checkmark.
pub static CHECKMARK: LazyLock<String> =
    LazyLock::new(|| format!("{}", console::style("✓").green()));

/// A red cross.
pub static ERROR_MARK: LazyLock<String> = LazyLock::new(|| format!("{}", console::style("✗").red()));
