//! Rule signature domain model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state_key::validate_identifier;
use crate::domain::errors::DomainResult;

/// Name of the catch-all rule every state defines.
pub const DEFAULT_RULE_NAME: &str = "Default";

/// Identity of a rule spec attached to a state.
///
/// Two signatures denote the same rule when both the name and the
/// destination state match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleSignature {
    pub name: String,
    pub dest: String,
}

impl RuleSignature {
    pub fn new(name: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dest: dest.into(),
        }
    }

    /// The catch-all rule pointing at `dest`.
    pub fn default_rule(dest: impl Into<String>) -> Self {
        Self::new(DEFAULT_RULE_NAME, dest)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_RULE_NAME
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_identifier("rule name", &self.name)?;
        validate_identifier("rule destination", &self.dest)
    }
}

impl fmt::Display for RuleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.dest)
    }
}
