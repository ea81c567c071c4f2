//! HTTP client settings and how they are read from the environment.

use anyhow::{Context, Result};
use log::debug;
use std::env;
use std::time::Duration;

/// Environment variable overriding the `User-Agent` header.
pub const USER_AGENT_ENV: &str = "FMG_HTTP_USER_AGENT";

/// Environment variable holding the per-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "FMG_HTTP_TIMEOUT_SECS";

/// Source of environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait Env: Send + Sync {
    fn var(&self, key: &str) -> Result<String, env::VarError>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Env for SystemEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

/// Settings applied to every client the factory builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub user_agent: String,
    /// Total time allowed for a request, from connect to the last body byte.
    pub timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

impl ClientSettings {
    /// Defaults overridden by [`USER_AGENT_ENV`] and [`TIMEOUT_ENV`].
    #[tracing::instrument(skip(env))]
    pub fn from_env(env: &dyn Env) -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(user_agent) = env.var(USER_AGENT_ENV) {
            if !user_agent.trim().is_empty() {
                debug!("Using user agent from {}: {}", USER_AGENT_ENV, user_agent);
                settings.user_agent = user_agent;
            }
        }

        if let Ok(timeout) = env.var(TIMEOUT_ENV) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", TIMEOUT_ENV, timeout))?;
            debug!("Using request timeout from {}: {}s", TIMEOUT_ENV, secs);
            settings.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(settings)
    }
}

pub fn default_user_agent() -> String {
    format!("fmg-http/{}", env!("FMG_HTTP_VERSION"))
}
