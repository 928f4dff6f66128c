//! Common test utilities for integration tests
//!
//! Provides store fixtures and content builders shared by the integration
//! test files.

#![allow(dead_code)]

use std::sync::Arc;

use exploration_stats::adapters::memory::InMemoryCounterStore;
use exploration_stats::adapters::sqlite::{create_migrated_test_pool, SqliteCounterStore};
use exploration_stats::domain::models::{Exploration, RuleSignature, StateDefinition};
use exploration_stats::CounterStore;

/// Fresh in-memory store.
pub fn memory_store() -> Arc<dyn CounterStore> {
    Arc::new(InMemoryCounterStore::new())
}

/// Fresh SQLite store backed by a migrated in-memory database.
pub async fn sqlite_store() -> Arc<dyn CounterStore> {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create migrated test pool");
    Arc::new(SqliteCounterStore::new(pool))
}

/// Both store backends, labelled for assertion messages.
pub async fn all_stores() -> Vec<(&'static str, Arc<dyn CounterStore>)> {
    vec![("memory", memory_store()), ("sqlite", sqlite_store().await)]
}

/// Exploration with one state that only has its Default rule.
pub fn default_only_exploration(exp_id: &str, state_ids: &[&str]) -> Exploration {
    state_ids.iter().fold(Exploration::new(exp_id), |exploration, state_id| {
        exploration.with_state(StateDefinition::with_default_rule(*state_id))
    })
}

/// Exploration with one state that defines `Equals -> End` plus the Default rule.
pub fn branching_exploration(exp_id: &str, state_id: &str) -> Exploration {
    Exploration::new(exp_id).with_state(StateDefinition::with_rules(
        state_id,
        vec![
            RuleSignature::new("Equals", "End"),
            RuleSignature::default_rule(state_id),
        ],
    ))
}
