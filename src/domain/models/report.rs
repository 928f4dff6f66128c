//! Improvable-state classification and report entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a state was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementType {
    /// Learners frequently land on the catch-all rule.
    Default,
    /// Learners frequently leave the state without any rule matching.
    Incomplete,
}

impl ImprovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for ImprovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter values feeding [`classify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationInput {
    pub total_hits: u64,
    pub default_rule_hits: u64,
    pub has_non_default_rules: bool,
    pub incomplete_count: u64,
    pub recorded_rule_hits: u64,
}

/// Outcome of classifying one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NotFlagged,
    Default { rank: u64 },
    Incomplete { rank: u64 },
}

impl Classification {
    /// Type and rank of a flagged state.
    pub fn flag(self) -> Option<(ImprovementType, u64)> {
        match self {
            Self::NotFlagged => None,
            Self::Default { rank } => Some((ImprovementType::Default, rank)),
            Self::Incomplete { rank } => Some((ImprovementType::Incomplete, rank)),
        }
    }
}

/// Decide whether a state needs author attention, and how urgently.
///
/// A state with hits but no recorded rule matches carries no evidence of an
/// authoring gap and is never flagged.
pub fn classify(input: ClassificationInput) -> Classification {
    if input.total_hits == 0 || input.recorded_rule_hits == 0 {
        return Classification::NotFlagged;
    }

    if input.has_non_default_rules
        && input.incomplete_count > 0
        && input.incomplete_count > input.default_rule_hits
    {
        return Classification::Incomplete {
            rank: input.incomplete_count,
        };
    }

    if input.default_rule_hits > 0 {
        return Classification::Default {
            rank: input.default_rule_hits,
        };
    }

    Classification::NotFlagged
}

/// One flagged state in the improvable-states report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovableStateReport {
    pub exp_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploration_title: Option<String>,
    pub state_id: String,
    #[serde(rename = "type")]
    pub improvement_type: ImprovementType,
    pub rank: u64,
}
