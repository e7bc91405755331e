// src/menu/session.rs
// =============================================================================
// What the menu remembers between actions:
// - the last fetched profile (at most one)
// - the Instagram login, if one was set
// - the HIBP API key, if one was set
//
// Nothing here is written to disk; it lives as long as the process.
// =============================================================================

use anyhow::{anyhow, Result};

use crate::config::{Credentials, Settings};
use crate::instagram::Profile;

pub const NO_PROFILE: &str = "No profile fetched. Run option 1 first.";

#[derive(Debug, Default)]
pub struct Session {
    last_profile: Option<Profile>,
    login: Option<Credentials>,
    hibp_api_key: Option<String>,
}

impl Session {
    // Starts with whatever login and key came from the environment
    pub fn new(settings: &Settings) -> Self {
        Self {
            last_profile: None,
            login: settings.login.clone(),
            hibp_api_key: settings.hibp_api_key.clone(),
        }
    }

    // Replaces any previously stored profile
    pub fn store_profile(&mut self, profile: Profile) {
        self.last_profile = Some(profile);
    }

    pub fn last_profile(&self) -> Option<&Profile> {
        self.last_profile.as_ref()
    }

    pub fn require_profile(&self) -> Result<&Profile> {
        self.last_profile().ok_or_else(|| anyhow!(NO_PROFILE))
    }

    pub fn login(&self) -> Option<&Credentials> {
        self.login.as_ref()
    }

    pub fn set_login(&mut self, login: Option<Credentials>) {
        self.login = login;
    }

    pub fn hibp_api_key(&self) -> Option<&str> {
        self.hibp_api_key.as_deref()
    }

    // A blank key clears it
    pub fn set_hibp_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.hibp_api_key = (!key.is_empty()).then(|| key.to_string());
    }
}
