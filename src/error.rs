//! Error kinds surfaced at the library boundary.
//!
//! Nothing here is caught internally: configuration errors are fatal at construction,
//! callback-contract violations surface from `choose`, and codec violations surface from
//! the loaders. A `choose` error never appends to the interaction log.

use thiserror::Error;

/// All failure modes of the exploration library.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// A configuration parameter is out of range (epsilon, lambda, probability floor,
    /// action count, empty policy bag).
    #[error("invalid explorer configuration: {0}")]
    BadConfig(String),

    /// A caller-supplied policy returned an action outside `1..=num_actions`.
    #[error("default policy chose action {action}, outside 1..={num_actions}")]
    BadCallerAction { action: u32, num_actions: u32 },

    /// A caller-supplied scorer returned a wrong-length vector, a NaN, or a negative
    /// score.
    #[error("scorer output rejected: {0}")]
    BadScorerOutput(String),

    /// A decision was requested with an empty unique id.
    #[error("unique id must not be empty")]
    EmptyUniqueId,

    /// A serialized interaction stream is truncated, has an unknown version, or violates
    /// a record invariant (probability outside `(0, 1]`, action id 0).
    #[error("corrupt interaction stream: {0}")]
    CorruptInteractionStream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_action() {
        let err = ExploreError::BadCallerAction {
            action: 9,
            num_actions: 4,
        };
        assert_eq!(err.to_string(), "default policy chose action 9, outside 1..=4");
    }

    #[test]
    fn display_carries_config_detail() {
        let err = ExploreError::BadConfig("epsilon must be in (0, 1], got 1.5".into());
        assert!(err.to_string().contains("epsilon"));
    }
}
