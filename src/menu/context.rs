// src/menu/context.rs
// Long-lived things every handler needs: settings, output helpers and the
// Instagram client (which carries the login cookies).

use anyhow::Result;
use tracing::warn;

use super::session::Session;
use crate::config::Settings;
use crate::instagram::InstagramClient;
use crate::ui::Ui;

pub struct Context {
    pub settings: Settings,
    pub ui: Ui,
    pub client: InstagramClient,
}

impl Context {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = InstagramClient::new(settings.timeout)?;
        let ui = Ui::new(settings.animations);
        Ok(Self {
            settings,
            ui,
            client,
        })
    }

    // Drops cookies from any earlier login
    pub fn reset_client(&mut self) -> Result<()> {
        self.client = InstagramClient::new(self.settings.timeout)?;
        Ok(())
    }

    // Logs in with the stored credentials if we aren't already
    //
    // A failed login is only a warning: public profiles still work.
    pub async fn ensure_login(&mut self, session: &Session) {
        let Some(creds) = session.login() else {
            return;
        };
        if self.client.is_logged_in() {
            return;
        }

        if let Err(e) = self.client.login(&creds.username, &creds.password).await {
            warn!(username = %creds.username, error = %e, "login failed");
            self.ui.warn(format!("[!] Instagram login failed: {e}"));
        }
    }
}
