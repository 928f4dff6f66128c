//! Exploration content model, as far as the analyzer needs it.
//!
//! The content model is owned by an external collaborator. The engine only
//! sees the ordered states of each exploration and the ordered rule specs
//! each state defines.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::rule::RuleSignature;
use super::state_key::{validate_identifier, StateKey};
use crate::domain::errors::{DomainError, DomainResult};

/// One state and the rule specs attached to its answer handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub id: String,
    #[serde(default)]
    pub rule_specs: Vec<RuleSignature>,
}

impl StateDefinition {
    /// A state with only the catch-all rule looping back to itself.
    pub fn with_default_rule(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            rule_specs: vec![RuleSignature::default_rule(id.clone())],
            id,
        }
    }

    pub fn with_rules(id: impl Into<String>, rule_specs: Vec<RuleSignature>) -> Self {
        Self {
            id: id.into(),
            rule_specs,
        }
    }

    pub fn has_non_default_rules(&self) -> bool {
        self.rule_specs.iter().any(|rule| !rule.is_default())
    }

    pub fn default_rule_count(&self) -> usize {
        self.rule_specs.iter().filter(|rule| rule.is_default()).count()
    }
}

/// Top-level interactive content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exploration {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub states: Vec<StateDefinition>,
}

impl Exploration {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            states: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_state(mut self, state: StateDefinition) -> Self {
        self.states.push(state);
        self
    }

    /// Add a state holding only the default rule, returning its id.
    pub fn add_state(&mut self, id: impl Into<String>) -> String {
        let state = StateDefinition::with_default_rule(id);
        let id = state.id.clone();
        self.states.push(state);
        id
    }

    pub fn state(&self, state_id: &str) -> Option<&StateDefinition> {
        self.states.iter().find(|s| s.id == state_id)
    }

    pub fn init_state_id(&self) -> Option<&str> {
        self.states.first().map(|s| s.id.as_str())
    }

    pub fn state_key(&self, state: &StateDefinition) -> DomainResult<StateKey> {
        StateKey::new(self.id.as_str(), state.id.as_str())
    }

    /// Reject structurally broken content: blank or duplicate ids and
    /// invalid rule signatures.
    ///
    /// A state need not list its Default rule; every state has one
    /// implicitly, so an empty `rule_specs` means Default-only.
    pub fn validate(&self) -> DomainResult<()> {
        validate_identifier("exploration id", &self.id)
            .map_err(|e| DomainError::malformed(&self.id, e.to_string()))?;

        let mut seen = HashSet::new();
        for state in &self.states {
            validate_identifier("state id", &state.id)
                .map_err(|e| DomainError::malformed(&self.id, e.to_string()))?;

            if !seen.insert(state.id.as_str()) {
                return Err(DomainError::malformed(
                    &self.id,
                    format!("duplicate state id '{}'", state.id),
                ));
            }
            for rule in &state.rule_specs {
                rule.validate().map_err(|e| {
                    DomainError::malformed(&self.id, format!("state '{}': {e}", state.id))
                })?;
            }
        }
        Ok(())
    }
}
