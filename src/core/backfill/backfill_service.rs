// History backfill - pulls each listened channel's past messages into the corpus.
//
// One task per channel walks the channel forward page by page, starting right
// after the newest message already stored. Channels never wait on each other;
// a failure ends only the failing channel's walk.

use crate::core::corpus::{ChatMessage, CorpusError, CorpusStore};
use crate::core::sanitizer::contains_link;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

/// Page size requested from the API (Discord's maximum).
pub const FETCH_LIMIT: u8 = 100;

/// Cursor used for a channel with nothing stored yet.
/// Discord IDs are non-zero, so "after 1" means "from the very beginning".
pub const HISTORY_START: u64 = 1;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("Unknown channel: {0}")]
    UnknownChannel(u64),

    #[error("Fetch error: {0}")]
    Fetch(#[from] SourceError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
}

// ============================================================================
// HISTORY SOURCE TRAIT (PORT)
// ============================================================================

/// Read access to channel history on the chat platform.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Display name of the channel, or `None` when the ID doesn't resolve.
    async fn channel_name(&self, channel_id: u64) -> Result<Option<String>, SourceError>;

    /// Up to `limit` messages with IDs strictly greater than `after`.
    /// Order within the page is not relied upon.
    async fn fetch_page(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, SourceError>;
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one channel's completed walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBackfill {
    pub channel_id: u64,
    pub pages: usize,
    pub fetched: usize,
    pub saved: usize,
}

#[derive(Debug, Default)]
pub struct BackfillReport {
    pub completed: Vec<ChannelBackfill>,
    pub failed: Vec<(u64, String)>,
}

impl BackfillReport {
    pub fn total_saved(&self) -> usize {
        self.completed.iter().map(|c| c.saved).sum()
    }
}

/// Whether a historical message belongs in the corpus.
///
/// Skips bot authors, embeds, links and anything that pings the bot itself
/// (those are requests to the bot, not conversation).
pub fn is_backfill_candidate(message: &ChatMessage, bot_id: u64) -> bool {
    !message.author_is_bot
        && message.embed_count == 0
        && !contains_link(&message.content)
        && !message.mentions_user(bot_id)
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct BackfillService<S: CorpusStore, M: MessageSource> {
    store: Arc<S>,
    source: Arc<M>,
    bot_id: u64,
    fetch_limit: u8,
}

impl<S, M> BackfillService<S, M>
where
    S: CorpusStore + 'static,
    M: MessageSource + 'static,
{
    pub fn new(store: Arc<S>, source: Arc<M>, bot_id: u64) -> Self {
        Self {
            store,
            source,
            bot_id,
            fetch_limit: FETCH_LIMIT,
        }
    }

    #[cfg(test)]
    fn with_fetch_limit(mut self, fetch_limit: u8) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    /// Backfill every channel concurrently and wait until all of them stop.
    pub async fn run(&self, channel_ids: &[u64]) -> BackfillReport {
        let mut tasks = JoinSet::new();

        for &channel_id in channel_ids {
            let store = Arc::clone(&self.store);
            let source = Arc::clone(&self.source);
            let bot_id = self.bot_id;
            let fetch_limit = self.fetch_limit;

            tasks.spawn(async move {
                let result =
                    backfill_channel(&*store, &*source, bot_id, fetch_limit, channel_id).await;
                (channel_id, result)
            });
        }

        let mut report = BackfillReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(summary))) => report.completed.push(summary),
                Ok((channel_id, Err(e))) => {
                    tracing::warn!(channel_id, "Backfill stopped: {}", e);
                    report.failed.push((channel_id, e.to_string()));
                }
                Err(e) => tracing::error!("Backfill task panicked: {}", e),
            }
        }

        tracing::info!(
            channels = report.completed.len(),
            failed = report.failed.len(),
            saved = report.total_saved(),
            "Backfill finished"
        );
        report
    }
}

async fn backfill_channel<S, M>(
    store: &S,
    source: &M,
    bot_id: u64,
    fetch_limit: u8,
    channel_id: u64,
) -> Result<ChannelBackfill, BackfillError>
where
    S: CorpusStore + ?Sized,
    M: MessageSource + ?Sized,
{
    let name = source
        .channel_name(channel_id)
        .await?
        .ok_or(BackfillError::UnknownChannel(channel_id))?;
    let debug_name = format!("#{} ({})", name, channel_id);

    let mut cursor = store.watermark(channel_id).await?.unwrap_or(HISTORY_START);
    let mut summary = ChannelBackfill {
        channel_id,
        ..Default::default()
    };
    tracing::info!("Backfilling {} after message {}", debug_name, cursor);

    loop {
        let page = source.fetch_page(channel_id, cursor, fetch_limit).await?;
        summary.pages += 1;
        summary.fetched += page.len();

        let mut saved = 0;
        for message in page.iter().filter(|m| is_backfill_candidate(m, bot_id)) {
            match store.insert(&message.to_record()).await {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => tracing::error!(
                    channel_id,
                    message_id = message.id,
                    "Failed to store message: {}",
                    e
                ),
            }
        }
        summary.saved += saved;
        tracing::debug!("[{}] saved {} of {} messages", debug_name, saved, page.len());

        if page.len() < fetch_limit as usize {
            break;
        }
        match page.iter().map(|m| m.id).max() {
            Some(newest) if newest > cursor => cursor = newest,
            _ => break,
        }
    }

    tracing::info!(
        channel_id = summary.channel_id,
        fetched = summary.fetched,
        "Done with {}: {} saved from {} pages",
        debug_name,
        summary.saved,
        summary.pages
    );
    Ok(summary)
}
