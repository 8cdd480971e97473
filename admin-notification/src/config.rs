use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use admin_shared::types::{CredentialProvider, StaticCredential, TokenFile};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_api_base_url() -> String { "http://localhost:5000/api".into() }
fn default_poll_interval_secs() -> u64 { 60 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: None,
            token: None,
            token_file: None,
        }
    }
}

impl AppConfig {
    /// Load from `ADMIN_NOTIFY_*` environment variables, after a best-effort
    /// `.env` load.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ADMIN_NOTIFY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        if self.request_timeout_secs == Some(0) {
            anyhow::bail!("request_timeout_secs must be greater than zero when set");
        }
        if self.api_base_url.trim().is_empty() {
            anyhow::bail!("api_base_url must not be empty");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// A literal token wins over the token file. With neither configured the
    /// bell runs signed out and never calls the backend.
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match (&self.token, &self.token_file) {
            (Some(token), _) => Arc::new(StaticCredential::new(token.clone())),
            (None, Some(path)) => Arc::new(TokenFile::new(path.clone())),
            (None, None) => Arc::new(StaticCredential::none()),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            api_base_url = %self.api_base_url,
            poll_interval_secs = self.poll_interval_secs,
            request_timeout_secs = ?self.request_timeout_secs,
            token = if self.token.is_some() { "(set)" } else { "(not set)" },
            token_file = ?self.token_file,
            "configuration loaded"
        );
    }
}
