// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "backfill/backfill_service.rs"]
pub mod backfill;

#[path = "corpus/mod.rs"]
pub mod corpus;

#[path = "ingestion/mod.rs"]
pub mod ingestion;

#[path = "markov/mod.rs"]
pub mod markov;

#[path = "sanitizer/sanitizer.rs"]
pub mod sanitizer;

#[path = "settings/settings.rs"]
pub mod settings;
