// In-memory implementation of CounterStore.
//
// Useful for tests and for running the bot without a database on disk.
// DashMap gives us a concurrent map, so simultaneous message events can
// bump counters without a surrounding Mutex.

use crate::core::counting::{CounterStore, CountingError, UserCount};
use async_trait::async_trait;
use dashmap::DashMap;

#[allow(dead_code)] // Not wired into main - the bot runs on SQLite
pub struct InMemoryCounterStore {
    /// Maps user_id -> all-time keyword count
    counts: DashMap<u64, u64>,
}

#[allow(dead_code)]
impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get_count(&self, user_id: u64) -> Result<Option<u64>, CountingError> {
        Ok(self.counts.get(&user_id).map(|entry| *entry))
    }

    async fn add_to_count(&self, user_id: u64, amount: u64) -> Result<(), CountingError> {
        // entry() API lets us update or insert atomically
        self.counts
            .entry(user_id)
            .and_modify(|count| *count = count.saturating_add(amount))
            .or_insert(amount);

        Ok(())
    }

    async fn top_counts(&self, limit: usize) -> Result<Vec<UserCount>, CountingError> {
        let mut users: Vec<UserCount> = self
            .counts
            .iter()
            .map(|entry| UserCount {
                user_id: *entry.key(),
                count: *entry.value(),
            })
            .collect();

        // Sort by count (highest first), then take only the requested number
        users.sort_by(|a, b| b.count.cmp(&a.count));
        users.truncate(limit);

        Ok(users)
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_accumulate() {
        let store = InMemoryCounterStore::new();

        // Unknown user has no counter yet
        assert_eq!(store.get_count(123).await.unwrap(), None);

        store.add_to_count(123, 2).await.unwrap();
        assert_eq!(store.get_count(123).await.unwrap(), Some(2));

        store.add_to_count(123, 3).await.unwrap();
        assert_eq!(store.get_count(123).await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_top_counts() {
        let store = InMemoryCounterStore::new();

        store.add_to_count(1, 5).await.unwrap();
        store.add_to_count(2, 9).await.unwrap();
        store.add_to_count(3, 1).await.unwrap();

        let top = store.top_counts(10).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].user_id, 2); // 9
        assert_eq!(top[1].user_id, 1); // 5
        assert_eq!(top[2].user_id, 3); // 1

        // Limit truncates after sorting
        let top = store.top_counts(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_id, 2);
    }
}
