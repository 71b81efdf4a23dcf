use clap::builder::styling::{AnsiColor, Effects, Styles};
use console::StyledObject;

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Terminal styles for CLI output.
pub trait AnsiStyles {
    /// Styles a section header.
    fn header(&self) -> StyledObject<&str>;

    /// Styles an error message.
    fn error(&self) -> StyledObject<&str>;
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// The styles used for `--help` output.
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl AnsiStyles for str {
    fn header(&self) -> StyledObject<&str> {
        console::style(self).yellow().bold()
    }

    fn error(&self) -> StyledObject<&str> {
        console::style(self).red()
    }
}
