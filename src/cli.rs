// src/cli.rs
// =============================================================================
// This file defines our command-line options using the `clap` crate.
//
// ig-osint is driven by an interactive menu, so there are no subcommands.
// The options here only configure the session: where output goes, how long
// network calls may take, and how chatty the logs are.
//
// The Instagram login and the HIBP key are never command-line flags, since
// anything in argv shows up in `ps`. They only come from the environment (or
// a .env file); config.rs reads them.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "ig-osint",
    version,
    about = "Interactive menu for Instagram profile reconnaissance",
    long_about = "ig-osint fetches public Instagram profile metadata, downloads media, \
                  writes PDF/TXT/JSON reports, zips downloads and optionally checks \
                  Have I Been Pwned. Everything happens from a numbered menu.",
    after_help = "Environment:\n  \
                  INSTALOADER_LOGIN     Instagram username for private profiles\n  \
                  INSTALOADER_PASSWORD  Password for INSTALOADER_LOGIN\n  \
                  HIBP_API_KEY          Have I Been Pwned API key"
)]
pub struct Cli {
    /// Directory that receives reports/ and downloads/
    #[arg(long, env = "IG_OSINT_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// HTTP timeout in seconds for Instagram requests
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Show info-level logs on stderr (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the decorative scanning animations
    #[arg(long)]
    pub no_animations: bool,
}
