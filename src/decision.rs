//! The shared choose contract every exploration strategy implements.
//!
//! A decision is a pure function of (configuration, callback outputs on this context,
//! seed): each strategy seeds a fresh generator per call and never consults global
//! state. The envelope records the exact per-draw propensity so downstream
//! inverse-propensity estimates stay unbiased.

use crate::action::{Action, ActionSet};
use crate::error::ExploreError;

/// Outcome of a single exploration draw.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExploreDecision {
    /// The selected action, in `1..=K`.
    pub action: Action,
    /// The exact probability under which `action` was drawn. Never zero, never above
    /// one.
    pub probability: f32,
    /// True when the draw came from the strategy's randomization branch and should be
    /// appended to the interaction log; false when the decision collapsed to an
    /// unexplored default.
    pub should_log: bool,
}

/// An exploration strategy over a fixed action set.
pub trait Explorer<C> {
    /// Choose an action for `context` under `seed`.
    ///
    /// Implementations validate callback outputs against `actions` and must return the
    /// true sampling probability of the emitted action.
    fn choose(
        &mut self,
        context: &C,
        actions: &ActionSet,
        seed: u32,
    ) -> Result<ExploreDecision, ExploreError>;

    /// Toggle the randomization branch. With exploration disabled, every strategy
    /// collapses to its default (or argmax-score) action with probability 1.0 and
    /// `should_log = false`.
    fn enable_explore(&mut self, explore: bool);
}
