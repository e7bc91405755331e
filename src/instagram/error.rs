// src/instagram/error.rs
// Errors the Instagram client can return.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("profile '{0}' does not exist")]
    ProfileNotFound(String),

    #[error("Instagram requires a login for this request (set one with option 5)")]
    LoginRequired,

    #[error("rate limited by Instagram, wait a few minutes and try again")]
    RateLimited,

    #[error("profile '{0}' is private; log in with an account that follows it")]
    PrivateProfile(String),

    #[error("two-factor authentication is required for this account")]
    TwoFactorRequired,

    #[error("Instagram wants a security checkpoint confirmed: {0}")]
    Checkpoint(String),

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("Instagram returned an invalid profile id '{0}'")]
    InvalidProfileId(String),

    #[error("unexpected HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode Instagram response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstagramError>;
