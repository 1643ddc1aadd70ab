// Watch-channel configuration: which channel the bot tallies the keyword in.
// There is exactly one watch channel for the whole bot; until it is set,
// no message is counted.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Storage port for the single watch-channel id.
#[async_trait]
pub trait WatchChannelStore: Send + Sync {
    /// `None` means no channel has been configured yet.
    async fn get_channel(&self) -> Result<Option<u64>, WatchError>;

    async fn set_channel(&self, channel_id: u64) -> Result<(), WatchError>;
}

pub struct WatchService<S: WatchChannelStore> {
    store: S,
}

impl<S: WatchChannelStore> WatchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn watch_channel(&self) -> Result<Option<u64>, WatchError> {
        self.store.get_channel().await
    }

    pub async fn set_watch_channel(&self, channel_id: u64) -> Result<(), WatchError> {
        self.store.set_channel(channel_id).await
    }

    /// Whether `channel_id` is the configured watch channel.
    /// Always false while unconfigured.
    #[allow(dead_code)] // Used by tests; the event handler reads watch_channel directly
    pub async fn is_watched(&self, channel_id: u64) -> Result<bool, WatchError> {
        Ok(self.store.get_channel().await? == Some(channel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeStore {
        channel: Mutex<Option<u64>>,
    }

    #[async_trait]
    impl WatchChannelStore for FakeStore {
        async fn get_channel(&self) -> Result<Option<u64>, WatchError> {
            Ok(*self.channel.lock().unwrap())
        }

        async fn set_channel(&self, channel_id: u64) -> Result<(), WatchError> {
            *self.channel.lock().unwrap() = Some(channel_id);
            Ok(())
        }
    }

    fn make_service() -> WatchService<FakeStore> {
        WatchService::new(FakeStore {
            channel: Mutex::new(None),
        })
    }

    #[tokio::test]
    async fn unset_channel_watches_nothing() {
        let service = make_service();

        assert_eq!(service.watch_channel().await.unwrap(), None);
        assert!(!service.is_watched(42).await.unwrap());
    }

    #[tokio::test]
    async fn set_then_gate() {
        let service = make_service();

        service.set_watch_channel(42).await.unwrap();
        assert_eq!(service.watch_channel().await.unwrap(), Some(42));
        assert!(service.is_watched(42).await.unwrap());
        assert!(!service.is_watched(43).await.unwrap());
    }

    #[tokio::test]
    async fn setting_again_replaces_the_channel() {
        let service = make_service();

        service.set_watch_channel(42).await.unwrap();
        service.set_watch_channel(99).await.unwrap();
        assert!(!service.is_watched(42).await.unwrap());
        assert!(service.is_watched(99).await.unwrap());
    }
}
