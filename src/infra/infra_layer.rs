// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "corpus/mod.rs"]
pub mod corpus;

#[path = "history/mod.rs"]
pub mod history;
