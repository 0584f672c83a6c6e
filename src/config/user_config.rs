//! User configuration for muzee
//!
//! Settings live in settings.json inside the config directory. Every key can be
//! overridden with a `MUZEE_`-prefixed environment variable, e.g.
//! `MUZEE_YOUTUBE_API_KEY` or `MUZEE_SESSION_TTL_HOURS`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Paths;

/// User configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Lifetime of a login session in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// YouTube Data API v3 key; empty means the offline catalog is used
    #[serde(default)]
    pub youtube_api_key: String,

    /// Number of search hits requested per recommendation query
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Mark the session cookie as Secure (serve over https)
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            youtube_api_key: String::new(),
            max_results: default_max_results(),
            cors_origins: Vec::new(),
            secure_cookies: false,
        }
    }
}

impl UserConfig {
    /// Load settings.json (writing defaults on first run) and apply env overrides
    pub fn load(paths: &Paths) -> Result<Self> {
        let settings_path = paths.settings_path();

        if !settings_path.exists() {
            Self::default().save(paths)?;
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::from(settings_path.as_path()).format(config::FileFormat::Json),
            )
            .add_source(
                config::Environment::with_prefix("MUZEE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()
            .with_context(|| format!("Failed to read {}", settings_path.display()))?;

        let config: UserConfig = layered
            .try_deserialize()
            .context("Failed to parse settings file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, paths: &Paths) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(paths.settings_path(), content).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_hours <= 0 {
            anyhow::bail!("session_ttl_hours must be positive");
        }
        if self.max_results == 0 || self.max_results > 50 {
            anyhow::bail!("max_results must be between 1 and 50");
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    pub fn has_youtube_key(&self) -> bool {
        !self.youtube_api_key.trim().is_empty()
    }
}

fn default_session_ttl_hours() -> i64 {
    // 30 days
    24 * 30
}

fn default_max_results() -> u32 {
    10
}
