use std::{convert::Infallible, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use functron_core::Timeout;

use crate::styles;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Arguments for the functron command
#[derive(Debug, Parser)]
#[command(name = "functron", author, version, about, styles=styles::styles())]
pub struct FunctronArgs {
    /// Name of the function to invoke
    pub name: String,

    /// Dockerfile used to build the function image
    #[arg(short = 'd', long)]
    pub dockerfile: Option<PathBuf>,

    /// File or directory to add to the build context, optionally stored under a new name
    #[arg(short = 'f', long = "file", value_name = "PATH[=NAME]")]
    pub files: Vec<FileSpec>,

    /// File whose contents are sent as standard input, or `-` to forward this process's stdin
    #[arg(short = 'i', long)]
    pub stdin: Option<PathBuf>,

    /// Seconds the function may run on the server [default: 5]
    #[arg(short = 't', long)]
    pub timeout: Option<Timeout>,

    /// URL of the functron server [env: FUNCTRON_URL]
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Seconds to wait for the server's reply [env: FUNCTRON_HTTP_TIMEOUT]
    #[arg(long, value_name = "SECS", value_parser = parse_http_timeout)]
    pub http_timeout: Option<Duration>,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,

    /// Show logs with error level
    #[arg(long)]
    pub error: bool,

    /// Show logs with warn level
    #[arg(long)]
    pub warn: bool,

    /// Show logs with info level
    #[arg(long)]
    pub info: bool,

    /// Show logs with debug level
    #[arg(long)]
    pub debug: bool,

    /// Show logs with trace level
    #[arg(long)]
    pub trace: bool,
}

/// A build context entry given as `PATH` or `PATH=NAME`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    /// Local path of the file or directory
    pub path: PathBuf,

    /// Name inside the archive; empty keeps the original name
    pub name: String,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Parses a positive, finite number of seconds.
fn parse_http_timeout(s: &str) -> Result<Duration, String> {
    match s.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(Duration::from_secs_f64(secs)),
        _ => Err(format!("expected a positive number of seconds, got {s:?}")),
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for FileSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, name) = s.split_once('=').unwrap_or((s, ""));
        Ok(Self {
            path: PathBuf::from(path),
            name: name.to_string(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
