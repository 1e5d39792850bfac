//! Action identifiers and the fixed action set they live in.

use crate::error::ExploreError;

/// A 1-based action identifier, valid in `1..=K` for the enclosing [`ActionSet`].
pub type Action = u32;

/// A fixed-cardinality set of actions `1..=K`, established at explorer construction and
/// immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSet {
    count: u32,
}

impl ActionSet {
    /// Create an action set of cardinality `count` (`count >= 1`).
    pub fn new(count: u32) -> Result<Self, ExploreError> {
        if count == 0 {
            return Err(ExploreError::BadConfig(
                "action set must contain at least one action".into(),
            ));
        }
        Ok(Self { count })
    }

    /// Number of actions in the set.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether `action` is a member of this set.
    #[must_use]
    pub fn contains(&self, action: Action) -> bool {
        action >= 1 && action <= self.count
    }

    /// Actions in natural order, `1..=K`.
    pub fn iter(&self) -> impl Iterator<Item = Action> {
        1..=self.count
    }

    /// Check a policy output against the set, mapping violations to
    /// [`ExploreError::BadCallerAction`].
    pub fn validate(&self, action: Action) -> Result<(), ExploreError> {
        if self.contains(action) {
            Ok(())
        } else {
            Err(ExploreError::BadCallerAction {
                action,
                num_actions: self.count,
            })
        }
    }
}
