// In-memory CorpusStore, the store double for core tests (test builds only).
// Nothing survives a restart.

use crate::core::corpus::{CorpusError, CorpusStore, MessageRecord};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Records keyed by (channel_id, message_id).
///
/// DashMap's entry API makes insert-if-absent atomic per key, so concurrent
/// backfill tasks and the live handler can write at the same time.
pub struct InMemoryCorpusStore {
    records: DashMap<(u64, u64), MessageRecord>,
}

impl InMemoryCorpusStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for InMemoryCorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorpusStore for InMemoryCorpusStore {
    async fn insert(&self, record: &MessageRecord) -> Result<bool, CorpusError> {
        match self.records.entry((record.channel_id, record.message_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(true)
            }
        }
    }

    async fn watermark(&self, channel_id: u64) -> Result<Option<u64>, CorpusError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.key().0 == channel_id)
            .map(|entry| entry.key().1)
            .max())
    }

    async fn all_ordered(&self) -> Result<Vec<MessageRecord>, CorpusError> {
        let mut records: Vec<MessageRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| (r.message_id, r.channel_id));
        Ok(records)
    }

    async fn count(&self) -> Result<u64, CorpusError> {
        Ok(self.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(channel_id: u64, message_id: u64, text: &str) -> MessageRecord {
        MessageRecord {
            channel_id,
            message_id,
            author_id: Some(1),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_no_op() {
        let store = InMemoryCorpusStore::new();

        assert!(store.insert(&record(1, 10, "first")).await.unwrap());
        assert!(!store.insert(&record(1, 10, "changed")).await.unwrap());

        let all = store.all_ordered().await.unwrap();
        assert_eq!(all, vec![record(1, 10, "first")]);
    }

    #[tokio::test]
    async fn watermark_is_per_channel() {
        let store = InMemoryCorpusStore::new();
        store.insert(&record(1, 10, "a")).await.unwrap();
        store.insert(&record(1, 30, "b")).await.unwrap();
        store.insert(&record(2, 20, "c")).await.unwrap();

        assert_eq!(store.watermark(1).await.unwrap(), Some(30));
        assert_eq!(store.watermark(2).await.unwrap(), Some(20));
        assert_eq!(store.watermark(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn all_ordered_sorts_by_message_id_across_channels() {
        let store = InMemoryCorpusStore::new();
        store.insert(&record(2, 30, "c")).await.unwrap();
        store.insert(&record(1, 10, "a")).await.unwrap();
        store.insert(&record(2, 20, "b")).await.unwrap();

        let texts: Vec<String> = store
            .all_ordered()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        // A second scan starts over.
        assert_eq!(store.all_ordered().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_duplicate_inserts_write_once() {
        let store = Arc::new(InMemoryCorpusStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert(&record(1, 10, "race")).await.unwrap()
            }));
        }

        let mut written = 0;
        for handle in handles {
            if handle.await.unwrap() {
                written += 1;
            }
        }

        assert_eq!(written, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
