use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AnswerTally, RuleHitRecord, RuleSignature, StateCounts, StateKey};

/// Storage port for per-state counters.
///
/// Absent keys read as zero or empty; queries never fail on "not found".
/// Implementations must make every increment atomic per key and must apply
/// tally replacement as a single linearizable operation. No lock may span
/// distinct keys for longer than a map lookup.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Add one to the hit counter of `key`.
    async fn increment_state_hits(&self, key: &StateKey) -> DomainResult<()>;

    /// Add one to the counter of `record.rule` within `record.key` and keep
    /// the record in the audit log.
    async fn record_rule_hit(&self, record: &RuleHitRecord) -> DomainResult<()>;

    /// Add one to the frequency of `answer`, creating it at one.
    async fn increment_unresolved_answer(&self, key: &StateKey, answer: &str) -> DomainResult<()>;

    /// Overwrite the whole unresolved-answer tally of `key`.
    ///
    /// Entries with a zero frequency are not stored.
    async fn replace_unresolved_answers(&self, key: &StateKey, tally: &AnswerTally) -> DomainResult<()>;

    /// Drop the listed answers from the tally, returning how many existed.
    async fn remove_unresolved_answers(&self, key: &StateKey, answers: &[String]) -> DomainResult<u64>;

    async fn count_state_hits(&self, key: &StateKey) -> DomainResult<u64>;

    async fn count_rule_hits(&self, key: &StateKey, rule: &RuleSignature) -> DomainResult<u64>;

    /// Snapshot copy of the unresolved-answer tally.
    async fn get_unresolved_answers(&self, key: &StateKey) -> DomainResult<AnswerTally>;

    /// Hit counter and every rule counter of `key`, read together.
    async fn state_counts(&self, key: &StateKey) -> DomainResult<StateCounts>;

    /// Newest-first audit records for one rule.
    async fn rule_hit_records(
        &self,
        key: &StateKey,
        rule: &RuleSignature,
        limit: usize,
    ) -> DomainResult<Vec<RuleHitRecord>>;
}
