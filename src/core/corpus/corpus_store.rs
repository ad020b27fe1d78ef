use super::corpus_models::MessageRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable, deduplicated storage of channel messages.
///
/// Records hold raw text only. Consumers sanitize on read.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Insert the record unless `(channel_id, message_id)` already exists.
    /// Returns `true` when a new row was written. Must be atomic per key.
    async fn insert(&self, record: &MessageRecord) -> Result<bool, CorpusError>;

    /// Highest message ID stored for the channel, if any.
    async fn watermark(&self, channel_id: u64) -> Result<Option<u64>, CorpusError>;

    /// Every record, oldest message first. Each call scans from the beginning.
    async fn all_ordered(&self) -> Result<Vec<MessageRecord>, CorpusError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, CorpusError>;
}
