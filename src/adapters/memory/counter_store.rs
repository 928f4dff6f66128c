//! In-memory implementation of the CounterStore.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::errors::DomainResult;
use crate::domain::models::{AnswerTally, RuleHitRecord, RuleSignature, StateCounts, StateKey};
use crate::domain::ports::CounterStore;

/// Audit records kept per state before the oldest are dropped.
const MAX_RECORDS_PER_STATE: usize = 1_000;

#[derive(Default)]
struct StateEntry {
    hits: AtomicU64,
    tally: Mutex<StateTally>,
}

#[derive(Default)]
struct StateTally {
    rule_hits: BTreeMap<RuleSignature, u64>,
    answers: AnswerTally,
    records: VecDeque<RuleHitRecord>,
}

/// Process-local counter store.
///
/// The key map lock is only held to find or insert a per-state entry; all
/// counting happens on the entry itself, so contention is per key.
#[derive(Default, Clone)]
pub struct InMemoryCounterStore {
    states: Arc<RwLock<HashMap<StateKey, Arc<StateEntry>>>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, key: &StateKey) -> Arc<StateEntry> {
        if let Some(entry) = self.states.read().await.get(key) {
            return Arc::clone(entry);
        }
        let mut states = self.states.write().await;
        Arc::clone(states.entry(key.clone()).or_default())
    }

    async fn existing(&self, key: &StateKey) -> Option<Arc<StateEntry>> {
        self.states.read().await.get(key).map(Arc::clone)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment_state_hits(&self, key: &StateKey) -> DomainResult<()> {
        self.entry(key).await.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn record_rule_hit(&self, record: &RuleHitRecord) -> DomainResult<()> {
        let entry = self.entry(&record.key).await;
        let mut tally = entry.tally.lock().await;

        *tally.rule_hits.entry(record.rule.clone()).or_insert(0) += 1;

        if tally.records.len() == MAX_RECORDS_PER_STATE {
            tally.records.pop_front();
        }
        tally.records.push_back(record.clone());
        Ok(())
    }

    async fn increment_unresolved_answer(&self, key: &StateKey, answer: &str) -> DomainResult<()> {
        let entry = self.entry(key).await;
        let mut tally = entry.tally.lock().await;
        *tally.answers.entry(answer.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn replace_unresolved_answers(&self, key: &StateKey, tally: &AnswerTally) -> DomainResult<()> {
        let replacement: AnswerTally = tally
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(answer, count)| (answer.clone(), *count))
            .collect();

        let entry = self.entry(key).await;
        entry.tally.lock().await.answers = replacement;
        Ok(())
    }

    async fn remove_unresolved_answers(&self, key: &StateKey, answers: &[String]) -> DomainResult<u64> {
        let Some(entry) = self.existing(key).await else {
            return Ok(0);
        };
        let mut tally = entry.tally.lock().await;
        let removed = answers
            .iter()
            .filter(|answer| tally.answers.remove(answer.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn count_state_hits(&self, key: &StateKey) -> DomainResult<u64> {
        Ok(self
            .existing(key)
            .await
            .map_or(0, |entry| entry.hits.load(Ordering::SeqCst)))
    }

    async fn count_rule_hits(&self, key: &StateKey, rule: &RuleSignature) -> DomainResult<u64> {
        let Some(entry) = self.existing(key).await else {
            return Ok(0);
        };
        let tally = entry.tally.lock().await;
        Ok(tally.rule_hits.get(rule).copied().unwrap_or(0))
    }

    async fn get_unresolved_answers(&self, key: &StateKey) -> DomainResult<AnswerTally> {
        let Some(entry) = self.existing(key).await else {
            return Ok(AnswerTally::new());
        };
        let tally = entry.tally.lock().await;
        Ok(tally.answers.clone())
    }

    async fn state_counts(&self, key: &StateKey) -> DomainResult<StateCounts> {
        let Some(entry) = self.existing(key).await else {
            return Ok(StateCounts::default());
        };
        let tally = entry.tally.lock().await;
        Ok(StateCounts {
            total_hits: entry.hits.load(Ordering::SeqCst),
            rule_hits: tally
                .rule_hits
                .iter()
                .map(|(rule, count)| (rule.clone(), *count))
                .collect(),
        })
    }

    async fn rule_hit_records(
        &self,
        key: &StateKey,
        rule: &RuleSignature,
        limit: usize,
    ) -> DomainResult<Vec<RuleHitRecord>> {
        let Some(entry) = self.existing(key).await else {
            return Ok(Vec::new());
        };
        let tally = entry.tally.lock().await;
        Ok(tally
            .records
            .iter()
            .rev()
            .filter(|record| &record.rule == rule)
            .take(limit)
            .cloned()
            .collect())
    }
}
