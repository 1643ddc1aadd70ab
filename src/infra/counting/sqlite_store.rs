use crate::core::counting::{CounterStore, CountingError, UserCount};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

/// SQLite-backed counter store. One row per user who has ever said the keyword.
pub struct SqliteCounterStore {
    pool: Pool<Sqlite>,
}

impl SqliteCounterStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new().connect(&conn_str).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS keyword_counts (
                user_id INTEGER PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn get_count(&self, user_id: u64) -> Result<Option<u64>, CountingError> {
        let result = sqlx::query("SELECT count FROM keyword_counts WHERE user_id = ?")
            .bind(user_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CountingError::Storage(e.to_string()))?;

        Ok(result.map(|row| row.get::<i64, _>(0) as u64))
    }

    async fn add_to_count(&self, user_id: u64, amount: u64) -> Result<(), CountingError> {
        // UPSERT: create the row on first increment, otherwise add to it.
        sqlx::query(
            r#"
            INSERT INTO keyword_counts (user_id, count)
            VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
            count = count + excluded.count
            "#,
        )
        .bind(user_id as i64)
        .bind(amount as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| CountingError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn top_counts(&self, limit: usize) -> Result<Vec<UserCount>, CountingError> {
        let rows = sqlx::query(
            "SELECT user_id, count FROM keyword_counts ORDER BY count DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CountingError::Storage(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| UserCount {
                user_id: row.get::<i64, _>(0) as u64,
                count: row.get::<i64, _>(1) as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_counts_persist_across_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("counters.db");
        let url = db_path.to_str().unwrap().to_string();

        {
            let store = SqliteCounterStore::new(&url).await.unwrap();
            store.add_to_count(7, 4).await.unwrap();
            store.add_to_count(7, 1).await.unwrap();
        }

        // Reopen from the same file
        let store = SqliteCounterStore::new(&url).await.unwrap();
        assert_eq!(store.get_count(7).await.unwrap(), Some(5));
        assert_eq!(store.get_count(8).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_top_counts_ordering() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("counters.db");
        let store = SqliteCounterStore::new(db_path.to_str().unwrap())
            .await
            .unwrap();

        store.add_to_count(1, 10).await.unwrap();
        store.add_to_count(2, 30).await.unwrap();
        store.add_to_count(3, 20).await.unwrap();

        let top = store.top_counts(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user_id, 2);
        assert_eq!(top[0].count, 30);
        assert_eq!(top[1].user_id, 3);
        assert_eq!(top[1].count, 20);
    }
}
