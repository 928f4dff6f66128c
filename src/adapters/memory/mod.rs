//! In-memory adapters, used for tests and single-process runs.

pub mod counter_store;

pub use counter_store::InMemoryCounterStore;
