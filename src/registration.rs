//! Startup-time wiring of the client factory and JSON settings.
//!
//! ```no_run
//! use fmg_http::codec::JsonConfig;
//! use fmg_http::registration::register;
//!
//! let helper = register()
//!     .with_json_config(JsonConfig::indented(4))
//!     .build();
//! ```

use log::debug;

use crate::codec::JsonConfig;
use crate::config::ClientSettings;
use crate::http::{ClientFactory, HttpClientHelper};

/// Starts a registration with default client settings and JSON config.
pub fn register() -> Registration {
    Registration::default()
}

/// Chaining builder for [`HttpClientHelper`].
///
/// The JSON config is fixed once [`Registration::build`] runs; helpers built
/// from it never observe later changes.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    settings: ClientSettings,
    json: Option<JsonConfig>,
}

impl Registration {
    /// Registers the settings used by the client factory.
    pub fn with_client_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Installs a JSON config, replacing any previous one. No validation is done.
    pub fn with_json_config(mut self, config: JsonConfig) -> Self {
        self.json = Some(config);
        self
    }

    /// Like [`Registration::with_json_config`], with the config produced by `provider`.
    pub fn with_json_config_from<F>(self, provider: F) -> Self
    where
        F: FnOnce() -> JsonConfig,
    {
        self.with_json_config(provider())
    }

    pub fn json_config(&self) -> Option<&JsonConfig> {
        self.json.as_ref()
    }

    pub fn build(self) -> HttpClientHelper {
        debug!(
            "Registering HTTP client (user agent: {}, timeout: {:?}, custom JSON config: {})",
            self.settings.user_agent,
            self.settings.timeout,
            self.json.is_some()
        );
        HttpClientHelper::new(
            ClientFactory::new(self.settings),
            self.json.unwrap_or_default(),
        )
    }
}
