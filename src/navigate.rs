use std::sync::Arc;

use crate::forge::Forge;

/// Where commit rows send the user. Fire-and-forget: failures are logged by
/// the implementation, never reported back to the screen.
pub trait Navigator: Send + Sync {
    fn show_commit(&self, owner: &str, repo: &str, oid: &str);
}

/// Opens the commit page of the forge in the system browser.
pub struct BrowserNavigator {
    forge: Arc<dyn Forge>,
}

impl BrowserNavigator {
    pub fn new(forge: Arc<dyn Forge>) -> Self {
        Self { forge }
    }
}

impl Navigator for BrowserNavigator {
    fn show_commit(&self, owner: &str, repo: &str, oid: &str) {
        let url = self.forge.web_url(owner, repo, "commit", oid);
        tracing::debug!(%url, "opening commit");
        if let Err(e) = open::that(&url) {
            tracing::warn!(%url, error = %e, "could not open browser");
        }
    }
}
