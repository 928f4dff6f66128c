//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async interface storage adapters must implement:
//! - CounterStore: per-state hit counters, rule-hit counters and
//!   unresolved-answer tallies
//!
//! The recorder and analyzer depend only on this trait, so any adapter can be
//! injected.

pub mod counter_store;

pub use counter_store::CounterStore;
