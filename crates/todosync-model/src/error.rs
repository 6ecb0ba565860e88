//! Error types for the record model

use crate::identity::Identity;

/// Record model errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A ledger record breaks one of its invariants
    #[error("invariant violated for {identity}: {reason}")]
    InvariantViolation {
        /// Offending record
        identity: Identity,
        /// Which invariant
        reason: String,
    },

    /// The same identity appears twice in one ledger
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(Identity),
}

impl ModelError {
    /// Create invariant violation for identity
    pub fn invariant(identity: &Identity, reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            identity: identity.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_display() {
        let err = ModelError::invariant(&Identity::new("a.tex:1"), "record without api_id");
        assert_eq!(
            err.to_string(),
            "invariant violated for a.tex:1: record without api_id"
        );
    }
}
