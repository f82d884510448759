use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_URL: &str = "http://localhost:8082";

/// Connection settings from the host's datasource form.
///
/// The base url is the only recognized option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl ConnectionSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Read settings from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No {} found, using default connection settings.", path.display());
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        let settings: ConnectionSettings = toml::from_str(&content)?;
        info!("Loaded connection settings for {}", settings.url);
        Ok(settings)
    }
}
