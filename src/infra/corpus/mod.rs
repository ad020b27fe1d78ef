// Implementations of the corpus store.

#[cfg(test)]
pub mod in_memory;
pub mod sqlite_store;

#[cfg(test)]
pub use in_memory::InMemoryCorpusStore;
pub use sqlite_store::SqliteCorpusStore;
