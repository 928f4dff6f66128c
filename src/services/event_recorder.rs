//! Event recorder: ingestion of learner interaction events.

use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AnswerTally, RuleHitRecord, RuleSignature, StateKey};
use crate::domain::ports::CounterStore;

/// Records state entries, rule matches and unresolved answers.
///
/// Repeated calls accumulate; nothing is deduplicated. Each call returns
/// only after the store has applied the write.
pub struct EventRecorder<S: CounterStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CounterStore + ?Sized> Clone for EventRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CounterStore + ?Sized> EventRecorder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn record_state_hit(&self, exploration_id: &str, state_id: &str) -> DomainResult<()> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.increment_state_hits(&key).await?;
        debug!(exploration_id, state_id, "state hit recorded");
        Ok(())
    }

    /// Count a match of `rule`; `extra_info` is kept for auditing only.
    pub async fn record_rule_hit(
        &self,
        exploration_id: &str,
        state_id: &str,
        rule: &RuleSignature,
        extra_info: &str,
    ) -> DomainResult<()> {
        let key = StateKey::new(exploration_id, state_id)?;
        rule.validate()?;

        let record = RuleHitRecord::new(key, rule.clone(), extra_info);
        self.store.record_rule_hit(&record).await?;
        debug!(exploration_id, state_id, rule = %rule, "rule hit recorded");
        Ok(())
    }

    pub async fn record_unresolved_answer(
        &self,
        exploration_id: &str,
        state_id: &str,
        answer: &str,
    ) -> DomainResult<()> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.increment_unresolved_answer(&key, answer).await?;
        debug!(exploration_id, state_id, "unresolved answer recorded");
        Ok(())
    }

    /// Atomically overwrite the tally; an empty map clears it.
    pub async fn replace_unresolved_answers(
        &self,
        exploration_id: &str,
        state_id: &str,
        tally: &AnswerTally,
    ) -> DomainResult<()> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.replace_unresolved_answers(&key, tally).await?;
        debug!(exploration_id, state_id, entries = tally.len(), "unresolved answers replaced");
        Ok(())
    }

    /// Drop answers an author has resolved, returning how many were present.
    pub async fn resolve_answers(
        &self,
        exploration_id: &str,
        state_id: &str,
        answers: &[String],
    ) -> DomainResult<u64> {
        let key = StateKey::new(exploration_id, state_id)?;
        let removed = self.store.remove_unresolved_answers(&key, answers).await?;
        debug!(exploration_id, state_id, removed, "unresolved answers resolved");
        Ok(removed)
    }
}
