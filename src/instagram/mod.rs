// src/instagram/mod.rs
// =============================================================================
// Everything that talks to Instagram.
//
// Submodules:
// - client: HTTP client for profile info, the timeline and logging in
// - download: Saves a profile's media to disk
// - models: API payloads and the ProfileSummary we show and export
// - username: Turns user input into a username, suggests look-alikes
// - error: The InstagramError type
// =============================================================================

mod client;
mod download;
mod error;
pub(crate) mod models;
mod username;

pub use client::InstagramClient;
pub use download::download_media;
pub use models::{Profile, ProfileSummary};
pub use username::{extract_username, suggest_usernames};
