use crate::core::watch::{WatchChannelStore, WatchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// On-disk shape of the watch-channel config.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct WatchConfigFile {
    channel_id: Option<u64>,
}

/// Persists the watch-channel id to a small JSON file, with an in-process
/// cache so reads (one per incoming message) never touch the disk.
pub struct JsonWatchStore {
    path: PathBuf,
    cache: RwLock<WatchConfigFile>,
}

impl JsonWatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = if path.exists() {
            let file = std::fs::File::open(&path).expect("Failed to open watch channel config");
            let config: WatchConfigFile = serde_json::from_reader(file).unwrap_or_default();
            RwLock::new(config)
        } else {
            RwLock::new(WatchConfigFile::default())
        };

        Self { path, cache }
    }

    async fn persist(&self) -> Result<(), WatchError> {
        let cache = self.cache.read().await;
        let file = std::fs::File::create(&self.path)
            .map_err(|e| WatchError::Storage(e.to_string()))?;
        serde_json::to_writer_pretty(file, &*cache)
            .map_err(|e| WatchError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl WatchChannelStore for JsonWatchStore {
    async fn get_channel(&self) -> Result<Option<u64>, WatchError> {
        let cache = self.cache.read().await;
        Ok(cache.channel_id)
    }

    async fn set_channel(&self, channel_id: u64) -> Result<(), WatchError> {
        let mut cache = self.cache.write().await;
        cache.channel_id = Some(channel_id);
        drop(cache); // Release lock before persisting
        self.persist().await
    }
}

/// In-memory watch store for tests and database-free runs.
#[allow(dead_code)] // Not wired into main - the bot persists its config
pub struct InMemoryWatchStore {
    channel: RwLock<Option<u64>>,
}

#[allow(dead_code)]
impl InMemoryWatchStore {
    pub fn new() -> Self {
        Self {
            channel: RwLock::new(None),
        }
    }
}

impl Default for InMemoryWatchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WatchChannelStore for InMemoryWatchStore {
    async fn get_channel(&self) -> Result<Option<u64>, WatchError> {
        Ok(*self.channel.read().await)
    }

    async fn set_channel(&self, channel_id: u64) -> Result<(), WatchError> {
        *self.channel.write().await = Some(channel_id);
        Ok(())
    }
}
