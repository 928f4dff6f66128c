//! State key domain model.
//!
//! A [`StateKey`] identifies one state inside one exploration. Every counter
//! in the store is keyed by it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};

/// Longest identifier accepted for explorations, states and rule parts.
pub const MAX_ID_LEN: usize = 255;

/// (exploration id, state id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub exploration_id: String,
    pub state_id: String,
}

impl StateKey {
    /// Build a key, rejecting malformed identifiers.
    ///
    /// Unknown but well-formed ids are accepted: a state may legitimately
    /// have no counters yet.
    pub fn new(exploration_id: impl Into<String>, state_id: impl Into<String>) -> DomainResult<Self> {
        let exploration_id = exploration_id.into();
        let state_id = state_id.into();

        validate_identifier("exploration id", &exploration_id)?;
        validate_identifier("state id", &state_id)?;

        Ok(Self {
            exploration_id,
            state_id,
        })
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exploration_id, self.state_id)
    }
}

/// Check that an identifier is non-blank, printable and of bounded length.
pub(crate) fn validate_identifier(label: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidReference(format!("{label} cannot be empty")));
    }
    if value.len() > MAX_ID_LEN {
        return Err(DomainError::InvalidReference(format!(
            "{label} exceeds {MAX_ID_LEN} bytes"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(DomainError::InvalidReference(format!(
            "{label} contains control characters"
        )));
    }
    Ok(())
}
