use clap::Parser;
use functron_cli::{handlers, FunctronArgs, FunctronCliResult};
use functron_utils::{CHECKMARK, ERROR_MARK};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> FunctronCliResult<()> {
    // Parse command line arguments
    let args = FunctronArgs::parse();

    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    handlers::log_level(&args);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let response = handlers::invoke_subcommand(&args).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(response.get_raw())?);
    } else {
        print!("{}", handlers::render_response(&response));
    }

    if response.is_success() {
        eprintln!("{} {} completed", &*CHECKMARK, args.name);
        Ok(())
    } else {
        eprintln!("{} {} reported errors", &*ERROR_MARK, args.name);
        std::process::exit(1);
    }
}
