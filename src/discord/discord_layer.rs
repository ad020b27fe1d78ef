// Discord layer - commands and event handlers.

use crate::core::ingestion::MessageDispatcher;
use crate::core::markov::MarkovService;
use crate::core::settings::MarkovSettings;
use crate::infra::corpus::SqliteCorpusStore;
use std::sync::Arc;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/message_events.rs"]
pub mod events;

/// Shared state handed to every command and event.
pub struct Data {
    pub corpus: Arc<SqliteCorpusStore>,
    pub markov: Arc<MarkovService>,
    pub settings: Arc<MarkovSettings>,
    /// Live message reactions, installed once backfill has been started.
    pub dispatcher: MessageDispatcher,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
