//! Persistence for the live-stream configuration record

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Default display copy shown before an administrator configures anything
pub const DEFAULT_TITLE: &str = "Transmisión en Vivo";
pub const DEFAULT_DESCRIPTION: &str = "Síguenos en directo";

/// The singleton record describing the live broadcast embed.
///
/// An empty `url` means "no stream configured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LiveStreamConfig {
    pub url: String,
    pub title: String,
    pub description: String,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

impl LiveStreamConfig {
    /// Record returned before any configuration has been saved.
    /// Synthesized on read, never persisted.
    pub fn default_record() -> Self {
        Self {
            url: String::new(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            active: false,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage seam for the singleton record so the medium is swappable
/// (file today, key-value store or relational row tomorrow)
#[async_trait]
pub trait LiveStreamStore: Send + Sync {
    /// Read the persisted record; None when no valid record exists
    async fn read(&self) -> Option<LiveStreamConfig>;

    /// Replace the persisted record as a whole
    async fn write(&self, config: &LiveStreamConfig) -> Result<(), StoreError>;
}

/// File-backed store keeping the record as one JSON document
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl LiveStreamStore for FileStore {
    async fn read(&self) -> Option<LiveStreamConfig> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(
                    "No live-stream record at {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    "Discarding unreadable live-stream record at {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn write(&self, config: &LiveStreamConfig) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(config)?;

        // Write to a sibling temp file and rename into place, so a crash
        // mid-write can never leave a half-written record behind
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}
