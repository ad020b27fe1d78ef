use crate::core::corpus::{CorpusError, CorpusStore, MessageRecord};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

/// SQLite-backed corpus. The table is keyed by (channel_id, message_id) and
/// written with `INSERT OR IGNORE`, so re-fetching history is harmless.
pub struct SqliteCorpusStore {
    pool: Pool<Sqlite>,
}

impl SqliteCorpusStore {
    /// Open (creating if needed) the database at `database_url` and migrate it.
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

        // In-memory databases are per connection, so keep a single one.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&conn_str)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                channel_id INTEGER NOT NULL,
                message_id INTEGER NOT NULL,
                author_id INTEGER,
                message_text TEXT NOT NULL,
                PRIMARY KEY (channel_id, message_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_message_id ON messages (message_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CorpusStore for SqliteCorpusStore {
    async fn insert(&self, record: &MessageRecord) -> Result<bool, CorpusError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO messages (channel_id, message_id, author_id, message_text)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.channel_id as i64)
        .bind(record.message_id as i64)
        .bind(record.author_id.map(|id| id as i64))
        .bind(record.text.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| CorpusError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn watermark(&self, channel_id: u64) -> Result<Option<u64>, CorpusError> {
        let row = sqlx::query("SELECT MAX(message_id) FROM messages WHERE channel_id = ?")
            .bind(channel_id as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CorpusError::Storage(e.to_string()))?;

        Ok(row.get::<Option<i64>, _>(0).map(|id| id as u64))
    }

    async fn all_ordered(&self) -> Result<Vec<MessageRecord>, CorpusError> {
        let rows = sqlx::query(
            "SELECT channel_id, message_id, author_id, message_text FROM messages ORDER BY message_id, channel_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CorpusError::Storage(e.to_string()))?;

        let records = rows
            .iter()
            .map(|row| MessageRecord {
                channel_id: row.get::<i64, _>("channel_id") as u64,
                message_id: row.get::<i64, _>("message_id") as u64,
                author_id: row.get::<Option<i64>, _>("author_id").map(|id| id as u64),
                text: row.get("message_text"),
            })
            .collect();

        Ok(records)
    }

    async fn count(&self) -> Result<u64, CorpusError> {
        let row = sqlx::query("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CorpusError::Storage(e.to_string()))?;

        Ok(row.get::<i64, _>(0) as u64)
    }
}
