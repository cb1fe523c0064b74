use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known file names relative to data_dir
pub const LIVE_STREAM_FILE: &str = "live_stream.json";

/// Default port the locally-running article backend listens on
pub const DEFAULT_LOCAL_API_PORT: u16 = 5001;

/// Server-wide configuration assembled once at startup
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub address: String,

    /// Directory for persistent runtime files
    pub data_dir: PathBuf,

    /// Port of the article backend when reached over a private network
    pub local_api_port: u16,

    /// Base URL of the article backend when reached from the public
    /// internet; None falls back to the built-in tunnel default
    pub public_api_url: Option<String>,
}

impl ServerConfig {
    /// Create a new configuration, resolving and creating the data directory
    pub fn new(
        address: String,
        data_dir: Option<PathBuf>,
        local_api_port: u16,
        public_api_url: Option<String>,
    ) -> anyhow::Result<Self> {
        // Determine data directory from arg/env or use default
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
                .join(".prensa"),
        };

        // Create data directory if it doesn't exist
        fs::create_dir_all(&data_dir)?;

        Ok(ServerConfig {
            address,
            data_dir,
            local_api_port,
            public_api_url,
        })
    }

    pub fn get_data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the persisted live-stream configuration record
    pub fn live_stream_path(&self) -> PathBuf {
        self.data_dir.join(LIVE_STREAM_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_is_kept() {
        let dir = std::env::temp_dir().join("prensa-config-test");
        let config = ServerConfig::new(
            "127.0.0.1:3000".to_string(),
            Some(dir.clone()),
            DEFAULT_LOCAL_API_PORT,
            None,
        )
        .unwrap();

        assert_eq!(config.get_data_dir(), dir.as_path());
        assert_eq!(config.live_stream_path(), dir.join(LIVE_STREAM_FILE));
        assert_eq!(config.local_api_port, 5001);
    }
}
