// The two live reactions: learn from listened channels, answer when pinged.

use super::dispatcher::{MessageReaction, OutgoingMessage};
use crate::core::corpus::{ChatMessage, CorpusStore};
use crate::core::markov::MarkovService;
use crate::core::sanitizer::{contains_link, sanitize};
use crate::core::settings::MarkovSettings;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Stores listened-channel messages and feeds them to the model.
pub struct IngestionReaction<S: CorpusStore> {
    store: Arc<S>,
    markov: Arc<MarkovService>,
    settings: Arc<MarkovSettings>,
}

impl<S: CorpusStore> IngestionReaction<S> {
    pub fn new(store: Arc<S>, markov: Arc<MarkovService>, settings: Arc<MarkovSettings>) -> Self {
        Self {
            store,
            markov,
            settings,
        }
    }
}

#[async_trait]
impl<S: CorpusStore + 'static> MessageReaction for IngestionReaction<S> {
    fn name(&self) -> &'static str {
        "markov-ingest"
    }

    async fn on_message(&self, message: &ChatMessage) -> Option<OutgoingMessage> {
        if !self.settings.listens_to(message.channel_id)
            || message.author_is_bot
            || contains_link(&message.content)
        {
            return None;
        }

        // Raw text goes to storage, sanitized text goes to the model.
        if let Err(e) = self.store.insert(&message.to_record()).await {
            tracing::error!(
                channel_id = message.channel_id,
                message_id = message.id,
                "Failed to store live message: {}",
                e
            );
        }

        let line = sanitize(&message.content);
        if !line.trim().is_empty() {
            self.markov.add_line(&line).await;
        }
        None
    }
}

/// Answers a mention in a reply channel with a generated sentence.
pub struct ReplyReaction {
    markov: Arc<MarkovService>,
    settings: Arc<MarkovSettings>,
    bot_id: u64,
}

impl ReplyReaction {
    pub fn new(markov: Arc<MarkovService>, settings: Arc<MarkovSettings>, bot_id: u64) -> Self {
        Self {
            markov,
            settings,
            bot_id,
        }
    }
}

#[async_trait]
impl MessageReaction for ReplyReaction {
    fn name(&self) -> &'static str {
        "markov-reply"
    }

    async fn on_message(&self, message: &ChatMessage) -> Option<OutgoingMessage> {
        if !self.settings.replies_in(message.channel_id) || !message.mentions_user(self.bot_id) {
            return None;
        }

        let seed = pick_seed(&message.content, &mut rand::thread_rng());
        let content = self.markov.generate(seed.as_deref()).await;
        tracing::debug!(
            channel_id = message.channel_id,
            seed = seed.as_deref().unwrap_or(""),
            "Generated reply"
        );

        Some(OutgoingMessage {
            channel_id: message.channel_id,
            content,
        })
    }
}

/// Pick a random seed word from a message that pinged the bot.
///
/// The first whitespace token is taken to be the mention and skipped; the rest
/// are sanitized and anything left empty is dropped.
pub fn pick_seed<R: Rng + ?Sized>(content: &str, rng: &mut R) -> Option<String> {
    let words: Vec<String> = content
        .split_whitespace()
        .skip(1)
        .map(sanitize)
        .filter(|word| !word.is_empty())
        .collect();
    words.choose(rng).cloned()
}
