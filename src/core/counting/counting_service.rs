// This is the counting module - it contains ALL the business logic for the
// keyword counter. Notice how this module has NO Discord-specific code
// (no serenity, no poise imports). It works with primitive types (u64, &str)
// so it could be driven by any frontend.

use async_trait::async_trait;
use thiserror::Error;

/// The keyword the bot tallies. Matching is case-insensitive.
pub const KEYWORD: &str = "movie";

/// Maximum number of entries a leaderboard render may contain.
pub const LEADERBOARD_MAX: usize = 16;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// One counter entry: a user and how many times they have said the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCount {
    pub user_id: u64,
    pub count: u64,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CountingError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid user ID")]
    InvalidId,
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================
// The core defines WHAT it needs from storage, not HOW it's implemented.
// The infra layer provides the actual implementation (SQLite, in-memory).

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Get a user's counter. `None` means the user has never said the keyword.
    async fn get_count(&self, user_id: u64) -> Result<Option<u64>, CountingError>;

    /// Add to a user's counter, creating it on first increment.
    async fn add_to_count(&self, user_id: u64, amount: u64) -> Result<(), CountingError>;

    /// The highest counters, descending, at most `limit` entries.
    async fn top_counts(&self, limit: usize) -> Result<Vec<UserCount>, CountingError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Counts keyword occurrences in `content`.
///
/// Case-insensitive, non-overlapping, and substring-based: "Movies!" counts
/// once for the keyword "movie".
pub fn keyword_occurrences(content: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    content
        .to_lowercase()
        .matches(&keyword.to_lowercase())
        .count()
}

/// The main service for counter operations, generic over the storage port.
pub struct CountingService<S: CounterStore> {
    store: S,
    keyword: String,
}

impl<S: CounterStore> CountingService<S> {
    pub fn new(store: S) -> Self {
        Self::with_keyword(store, KEYWORD)
    }

    pub fn with_keyword(store: S, keyword: impl Into<String>) -> Self {
        Self {
            store,
            keyword: keyword.into(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    fn validate_user_id(user_id: u64) -> Result<(), CountingError> {
        if user_id == 0 {
            Err(CountingError::InvalidId)
        } else {
            Ok(())
        }
    }

    /// Tally the keyword occurrences in a message.
    ///
    /// Every occurrence counts, so a message saying the keyword three times
    /// adds three. Returns how many occurrences were found; 0 means the
    /// counter was not touched.
    pub async fn record_message(
        &self,
        user_id: u64,
        content: &str,
    ) -> Result<usize, CountingError> {
        Self::validate_user_id(user_id)?;

        let occurrences = keyword_occurrences(content, &self.keyword);
        if occurrences > 0 {
            self.store.add_to_count(user_id, occurrences as u64).await?;
        }

        Ok(occurrences)
    }

    /// A user's all-time counter. `None` if they have never said the keyword.
    pub async fn user_count(&self, user_id: u64) -> Result<Option<u64>, CountingError> {
        Self::validate_user_id(user_id)?;

        self.store.get_count(user_id).await
    }

    /// The all-time leaderboard, highest counters first.
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<UserCount>, CountingError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.store.top_counts(limit).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
