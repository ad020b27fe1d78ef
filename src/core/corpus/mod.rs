// Core corpus module - the message records the Markov model is built from.

pub mod corpus_models;
pub mod corpus_store;

pub use corpus_models::{ChatMessage, MessageRecord};
pub use corpus_store::{CorpusError, CorpusStore};
