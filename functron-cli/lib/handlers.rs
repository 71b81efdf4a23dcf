//! Handlers for the functron command.

use std::{
    fmt::Write as _,
    fs,
    io::{self, Read},
    path::Path,
};

use functron_core::{
    ClientOptions, FunctronClient, Invocation, InvocationResponse, Timeout, ValuePair,
};
use functron_utils::env;

use crate::{AnsiStyles, FunctronArgs, FunctronCliError, FunctronCliResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const STDIN_PATH: &str = "-";

//--------------------------------------------------------------------------------------------------
// Functions: Handlers
//--------------------------------------------------------------------------------------------------

/// Sets RUST_LOG from the verbosity flags, if any was given.
pub fn log_level(args: &FunctronArgs) {
    let level = if args.trace {
        Some("trace")
    } else if args.debug {
        Some("debug")
    } else if args.info {
        Some("info")
    } else if args.warn {
        Some("warn")
    } else if args.error {
        Some("error")
    } else {
        None
    };

    if let Some(level) = level {
        std::env::set_var(
            "RUST_LOG",
            format!("functron={level},functron_core={level},functron_cli={level}"),
        );
    }
}

/// Builds the invocation described by `args`, posts it and returns the decoded response.
pub async fn invoke_subcommand(args: &FunctronArgs) -> FunctronCliResult<InvocationResponse> {
    let client = FunctronClient::with_options(&client_options(args))?;
    let timeout = resolve_timeout(args.timeout)?;
    let mut invocation = build_invocation(args, timeout)?;
    let stdin = read_stdin(args.stdin.as_deref())?;

    tracing::info!(
        "invoking {} at {} with timeout {}",
        args.name,
        client.endpoint(),
        timeout
    );

    let response = invocation
        .invoke_with(&client, stdin.as_deref(), None)
        .await?;

    Ok(response)
}

/// Renders each non-empty output stream and the server's errors for the terminal.
pub fn render_response(response: &InvocationResponse) -> String {
    let mut out = String::new();
    let pairs = [
        ("build", response.get_build_output()),
        ("command", response.get_cmd_output()),
        ("cleanup", response.get_cleanup_output()),
    ];

    for (phase, pair) in pairs {
        render_pair(&mut out, phase, pair);
    }

    for error in response.get_errors() {
        let _ = writeln!(out, "{} {}", "error:".error(), error);
    }

    if let Some(detail) = response.get_detailed_error() {
        let _ = writeln!(out, "{} {}", "detail:".error(), detail);
    }

    out
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

/// Picks the endpoint and transport deadline: flags first, then the environment, then defaults.
pub fn client_options(args: &FunctronArgs) -> ClientOptions {
    let endpoint = args.url.clone().unwrap_or_else(env::get_endpoint_url);
    let request_timeout = args.http_timeout.or_else(env::get_http_timeout);

    match request_timeout {
        Some(timeout) => ClientOptions::builder()
            .endpoint(endpoint)
            .request_timeout(timeout)
            .build(),
        None => ClientOptions::builder().endpoint(endpoint).build(),
    }
}

/// Picks the remote execution timeout: the flag first, then FUNCTRON_TIMEOUT, then the default.
pub fn resolve_timeout(flag: Option<Timeout>) -> FunctronCliResult<Timeout> {
    if let Some(timeout) = flag {
        return Ok(timeout);
    }

    match env::get_timeout_var() {
        Some(raw) => raw
            .parse::<Timeout>()
            .map_err(FunctronCliError::InvalidTimeoutVar),
        None => Ok(Timeout::default()),
    }
}

fn build_invocation(args: &FunctronArgs, timeout: Timeout) -> FunctronCliResult<Invocation> {
    let mut invocation = Invocation::with_timeout(args.name.clone(), timeout.as_secs_f64())?;

    if let Some(dockerfile) = &args.dockerfile {
        invocation.set_dockerfile(dockerfile)?;
    }

    for file in &args.files {
        invocation.add_files(&file.path, &file.name)?;
    }

    Ok(invocation)
}

fn read_stdin(source: Option<&Path>) -> FunctronCliResult<Option<Vec<u8>>> {
    let Some(source) = source else {
        return Ok(None);
    };

    let bytes = if source == Path::new(STDIN_PATH) {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        bytes
    } else {
        fs::read(source)?
    };

    tracing::debug!("read {} bytes of standard input", bytes.len());
    Ok(Some(bytes))
}

fn render_pair(out: &mut String, phase: &str, pair: &ValuePair) {
    let streams = [("stdout", pair.get_stdout()), ("stderr", pair.get_stderr())];
    for (stream, value) in streams {
        let Some(value) = value else {
            continue;
        };

        let header = format!("[{phase} {stream}]");
        let _ = writeln!(out, "{}", header.as_str().header());

        let text = value.to_string_lossy();
        out.push_str(&text);
        if !text.ends_with('\n') {
            out.push('\n');
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
