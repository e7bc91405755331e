// src/config.rs
// =============================================================================
// Runtime settings: where files go, how long HTTP calls may take, and any
// login or API key handed to us through the environment.
//
// Sources, highest priority first:
// 1. Command-line options (see cli.rs)
// 2. Environment variables, including a .env file loaded in main.rs
// 3. Built-in defaults
//
// The login and the HIBP key only ever come from the environment.
// =============================================================================

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

pub const REPORTS_SUBDIR: &str = "reports";
pub const DOWNLOADS_SUBDIR: &str = "downloads";

pub const LOGIN_USER_VAR: &str = "INSTALOADER_LOGIN";
pub const LOGIN_PASSWORD_VAR: &str = "INSTALOADER_PASSWORD";
pub const HIBP_KEY_VAR: &str = "HIBP_API_KEY";

// An Instagram username/password pair
//
// Debug is written by hand so the password never ends up in a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub timeout: Duration,
    pub animations: bool,
    pub login: Option<Credentials>,
    pub hibp_api_key: Option<String>,
}

impl Settings {
    // Builds settings rooted at `output_dir` with everything else defaulted
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            reports_dir: output_dir.join(REPORTS_SUBDIR),
            downloads_dir: output_dir.join(DOWNLOADS_SUBDIR),
            output_dir,
            timeout: Duration::from_secs(30),
            animations: true,
            login: None,
            hibp_api_key: None,
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self::from_sources(cli, |key| std::env::var(key).ok())
    }

    // `env` looks up one environment variable
    fn from_sources(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::new(&cli.output_dir);
        settings.timeout = Duration::from_secs(cli.timeout);
        settings.animations = !cli.no_animations;

        let user = env(LOGIN_USER_VAR);
        let password = env(LOGIN_PASSWORD_VAR);
        // Usernames get trimmed, passwords are used exactly as given
        settings.login = credentials_from_env(
            user.as_deref().map(str::trim).filter(|v| !v.is_empty()),
            password.as_deref().filter(|v| !v.is_empty()),
        );
        settings.hibp_api_key = env(HIBP_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        settings
    }

    // Creates output/, output/reports/ and output/downloads/
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.reports_dir, &self.downloads_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    // Folder that holds the downloaded media of one profile
    pub fn profile_downloads(&self, username: &str) -> PathBuf {
        self.downloads_dir.join(username)
    }

    // Base path (without ".zip") of a profile's media archive
    pub fn media_archive_base(&self, username: &str) -> PathBuf {
        self.downloads_dir.join(format!("{username}_media"))
    }
}

// A login is only usable when both halves are present
fn credentials_from_env(user: Option<&str>, password: Option<&str>) -> Option<Credentials> {
    match (user, password) {
        (Some(username), Some(password)) => Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        (Some(username), None) => {
            tracing::warn!(%username, "login user set without a password, ignoring it");
            None
        }
        _ => None,
    }
}
