// Implementations for the watch-channel configuration.

pub mod json_store;

pub use json_store::{InMemoryWatchStore, JsonWatchStore};
