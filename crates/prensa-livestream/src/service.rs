use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use url::Url;
use utoipa::ToSchema;

use crate::store::{LiveStreamConfig, LiveStreamStore, StoreError, DEFAULT_TITLE};

#[derive(Error, Debug)]
pub enum LiveStreamError {
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Fields accepted on the write path; every field is optional and falls
/// back to a default, with an explicit `false` for `active` preserved
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LiveStreamUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Service that owns the singleton live-stream record
pub struct LiveStreamService {
    store: Arc<dyn LiveStreamStore>,
    // Serializes writers so two concurrent updates cannot interleave;
    // the last completed write still wins as a whole record
    write_lock: Mutex<()>,
}

impl LiveStreamService {
    pub fn new(store: Arc<dyn LiveStreamStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the current record.
    ///
    /// Never fails: absent or unreadable storage degrades to the default
    /// record with a current timestamp.
    pub async fn get_config(&self) -> LiveStreamConfig {
        self.store
            .read()
            .await
            .unwrap_or_else(LiveStreamConfig::default_record)
    }

    /// Validate and persist a full replacement record.
    ///
    /// A non-empty URL must parse as an absolute URL; an empty URL means
    /// "no stream configured" and is always valid. Every successful call
    /// overwrites all content fields and stamps a fresh `updated_at`.
    pub async fn update_config(
        &self,
        update: LiveStreamUpdate,
    ) -> Result<LiveStreamConfig, LiveStreamError> {
        let url = update.url.unwrap_or_default();
        if !url.is_empty() {
            Url::parse(&url).map_err(|e| LiveStreamError::InvalidUrl(e.to_string()))?;
        }

        let config = LiveStreamConfig {
            url,
            title: update.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: update.description.unwrap_or_default(),
            active: update.active.unwrap_or(false),
            updated_at: Utc::now(),
        };

        let _guard = self.write_lock.lock().await;
        self.store.write(&config).await?;

        Ok(config)
    }
}
