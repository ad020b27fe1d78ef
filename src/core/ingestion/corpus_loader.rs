use crate::core::backfill::{BackfillReport, BackfillService, MessageSource};
use crate::core::corpus::{CorpusError, CorpusStore};
use crate::core::markov::MarkovService;
use crate::core::sanitizer::{contains_link, sanitize};

/// Feed the whole corpus, oldest first, into the model.
///
/// Stored text is raw, so it is sanitized here. Returns the number of lines
/// the model took in.
pub async fn rebuild_model<S: CorpusStore + ?Sized>(
    store: &S,
    markov: &MarkovService,
) -> Result<usize, CorpusError> {
    let records = store.all_ordered().await?;
    let total = records.len();

    let lines = records
        .into_iter()
        .filter(|record| !contains_link(&record.text))
        .map(|record| sanitize(&record.text));
    let loaded = markov.load_lines(lines).await;

    tracing::info!(records = total, lines = loaded, "Markov model loaded from corpus");
    Ok(loaded)
}

/// Startup sequence: backfill every channel, wait for all of them, then load
/// the model from the complete corpus.
pub async fn backfill_then_load<S, M>(
    backfill: &BackfillService<S, M>,
    store: &S,
    markov: &MarkovService,
    channel_ids: &[u64],
) -> Result<(BackfillReport, usize), CorpusError>
where
    S: CorpusStore + 'static,
    M: MessageSource + 'static,
{
    let report = backfill.run(channel_ids).await;
    let loaded = rebuild_model(store, markov).await?;
    Ok((report, loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backfill::SourceError;
    use crate::core::corpus::{ChatMessage, MessageRecord};
    use crate::infra::corpus::InMemoryCorpusStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn record(channel_id: u64, message_id: u64, text: &str) -> MessageRecord {
        MessageRecord {
            channel_id,
            message_id,
            author_id: None,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn rebuild_sanitizes_and_skips_links() {
        let store = InMemoryCorpusStore::new();
        store.insert(&record(1, 3, "<@1> good morning")).await.unwrap();
        store.insert(&record(1, 4, "read http://x.y")).await.unwrap();
        store.insert(&record(2, 5, "<#9>")).await.unwrap();

        let markov = MarkovService::default();
        let loaded = rebuild_model(&store, &markov).await.unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(markov.generate(None).await, "good morning");
    }

    struct TwoMessages;

    #[async_trait]
    impl MessageSource for TwoMessages {
        async fn channel_name(&self, _: u64) -> Result<Option<String>, SourceError> {
            Ok(Some("general".to_string()))
        }

        async fn fetch_page(
            &self,
            channel_id: u64,
            after: u64,
            _: u8,
        ) -> Result<Vec<ChatMessage>, SourceError> {
            Ok([(2, "first line"), (3, "second line")]
                .into_iter()
                .filter(|(id, _)| *id > after)
                .map(|(id, text)| ChatMessage {
                    id,
                    channel_id,
                    author_id: Some(1),
                    content: text.to_string(),
                    ..Default::default()
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn model_is_loaded_after_backfill_completes() {
        let store = Arc::new(InMemoryCorpusStore::new());
        let backfill = BackfillService::new(Arc::clone(&store), Arc::new(TwoMessages), 999);
        let markov = MarkovService::default();

        let (report, loaded) = backfill_then_load(&backfill, &*store, &markov, &[42])
            .await
            .unwrap();

        assert_eq!(report.total_saved(), 2);
        assert_eq!(loaded, 2);
        let stats = markov.stats().await;
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 3);
    }
}
