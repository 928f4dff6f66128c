//! Counter snapshots and audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::rule::RuleSignature;
use super::state_key::StateKey;

/// Raw answer text mapped to how often it was submitted without a match.
pub type AnswerTally = BTreeMap<String, u64>;

/// Hit and rule-match counters of one state, read at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub total_hits: u64,
    pub rule_hits: Vec<(RuleSignature, u64)>,
}

impl StateCounts {
    /// Matches of every rule named `Default`, whatever its destination.
    pub fn default_rule_hits(&self) -> u64 {
        self.rule_hits
            .iter()
            .filter(|(rule, _)| rule.is_default())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn recorded_rule_hits(&self) -> u64 {
        self.rule_hits.iter().map(|(_, count)| count).sum()
    }

    /// Entries that never reached any recorded rule match.
    pub fn incomplete_count(&self) -> u64 {
        self.total_hits.saturating_sub(self.recorded_rule_hits())
    }

    /// Number of distinct Default-named signatures with recorded matches.
    pub fn default_signature_count(&self) -> usize {
        self.rule_hits.iter().filter(|(rule, _)| rule.is_default()).count()
    }
}

/// Audit entry kept for every recorded rule match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHitRecord {
    pub id: Uuid,
    pub key: StateKey,
    pub rule: RuleSignature,
    pub extra_info: String,
    pub recorded_at: DateTime<Utc>,
}

impl RuleHitRecord {
    pub fn new(key: StateKey, rule: RuleSignature, extra_info: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            rule,
            extra_info: extra_info.into(),
            recorded_at: Utc::now(),
        }
    }
}
