// Core ingestion module - live message fan-out and corpus-to-model loading.

pub mod corpus_loader;
pub mod dispatcher;
pub mod reactions;

pub use corpus_loader::backfill_then_load;
pub use dispatcher::MessageDispatcher;
pub use reactions::{IngestionReaction, ReplyReaction};
