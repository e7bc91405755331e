// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load a .env file, if there is one
// 2. Parse command-line options using clap
// 3. Set up logging (stderr, so it never mixes with the menu)
// 4. Create the output directories and hand over to the menu loop
// 5. Exit with 0 on a normal exit, 2 on an unexpected error
//
// Rust concepts used:
// - async/await: network and file I/O go through tokio
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod archive; // src/archive.rs - zipping downloaded media
mod breach; // src/breach.rs - Have I Been Pwned lookups
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - settings and directories
mod instagram; // src/instagram/ - Instagram client, downloads, usernames
mod menu; // src/menu/ - the interactive menu and its handlers
mod report; // src/report/ - tables and PDF/TXT/JSON reports
mod ui; // src/ui.rs - colors, animations and prompts

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use config::Settings;
use tracing_subscriber::EnvFilter;

// Everything is sequential, so a single-threaded runtime is all we need
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_cli(&cli);
    settings.ensure_directories()?;

    tracing::info!(
        output = %settings.output_dir.display(),
        login = settings.login.is_some(),
        hibp = settings.hibp_api_key.is_some(),
        "starting session"
    );

    menu::run(settings).await
}

// RUST_LOG wins; otherwise warnings only, or info with --verbose
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ig_osint=info"
    } else {
        "ig_osint=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
