//! Read-side queries used by the authoring surface.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AnswerTally, RuleHitRecord, RuleSignature, StateKey};
use crate::domain::ports::CounterStore;

/// Match count of one rule within a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBreakdown {
    pub rule: RuleSignature,
    pub hits: u64,
}

/// Everything the store knows about one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub exploration_id: String,
    pub state_id: String,
    pub total_hits: u64,
    pub default_rule_hits: u64,
    pub incomplete_count: u64,
    pub rules: Vec<RuleBreakdown>,
    pub top_unresolved_answers: Vec<(String, u64)>,
}

pub struct StatsService<S: CounterStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CounterStore + ?Sized> StatsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn count_state_hits(&self, exploration_id: &str, state_id: &str) -> DomainResult<u64> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.count_state_hits(&key).await
    }

    pub async fn count_rule_hits(
        &self,
        exploration_id: &str,
        state_id: &str,
        rule: &RuleSignature,
    ) -> DomainResult<u64> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.count_rule_hits(&key, rule).await
    }

    pub async fn get_unresolved_answers(&self, exploration_id: &str, state_id: &str) -> DomainResult<AnswerTally> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.get_unresolved_answers(&key).await
    }

    /// The `n` most frequent unresolved answers; ties by answer text.
    pub async fn top_unresolved_answers(
        &self,
        exploration_id: &str,
        state_id: &str,
        n: usize,
    ) -> DomainResult<Vec<(String, u64)>> {
        let tally = self.get_unresolved_answers(exploration_id, state_id).await?;
        Ok(top_answers(tally, n))
    }

    pub async fn rule_hit_records(
        &self,
        exploration_id: &str,
        state_id: &str,
        rule: &RuleSignature,
        limit: usize,
    ) -> DomainResult<Vec<RuleHitRecord>> {
        let key = StateKey::new(exploration_id, state_id)?;
        self.store.rule_hit_records(&key, rule, limit).await
    }

    pub async fn state_summary(
        &self,
        exploration_id: &str,
        state_id: &str,
        top_answers_n: usize,
    ) -> DomainResult<StateSummary> {
        let key = StateKey::new(exploration_id, state_id)?;
        let counts = self.store.state_counts(&key).await?;
        let answers = self.store.get_unresolved_answers(&key).await?;

        let mut rules: Vec<RuleBreakdown> = counts
            .rule_hits
            .iter()
            .map(|(rule, hits)| RuleBreakdown {
                rule: rule.clone(),
                hits: *hits,
            })
            .collect();
        rules.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.rule.cmp(&b.rule)));

        Ok(StateSummary {
            exploration_id: key.exploration_id,
            state_id: key.state_id,
            total_hits: counts.total_hits,
            default_rule_hits: counts.default_rule_hits(),
            incomplete_count: counts.incomplete_count(),
            rules,
            top_unresolved_answers: top_answers(answers, top_answers_n),
        })
    }
}

fn top_answers(tally: AnswerTally, n: usize) -> Vec<(String, u64)> {
    // BTreeMap iteration is already ordered by answer text; the stable sort keeps it for ties.
    let mut answers: Vec<(String, u64)> = tally.into_iter().collect();
    answers.sort_by(|a, b| b.1.cmp(&a.1));
    answers.truncate(n);
    answers
}
