//! Builds the reqwest clients used for individual calls.

use anyhow::{Context, Result};

use crate::config::ClientSettings;

/// Creates one client per call from the registered settings.
///
/// Clients carry only the user agent and timeout; request headers are set on
/// each request so repeated names keep every value.
#[derive(Debug, Clone, Default)]
pub struct ClientFactory {
    settings: ClientSettings,
}

impl ClientFactory {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn build(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.settings.user_agent);

        if let Some(timeout) = self.settings.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().context("Failed to build HTTP client")
    }

    /// Blocking client. Must be used outside any async runtime.
    pub fn build_blocking(&self) -> Result<reqwest::blocking::Client> {
        let builder = reqwest::blocking::Client::builder()
            .user_agent(&self.settings.user_agent)
            // The blocking client has a 30s default; `None` means unlimited here too.
            .timeout(self.settings.timeout);

        builder.build().context("Failed to build blocking HTTP client")
    }
}
