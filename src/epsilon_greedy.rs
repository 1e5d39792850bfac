//! Epsilon-greedy exploration.
//!
//! With probability `epsilon` the draw is uniform over the action set; otherwise the
//! caller's default policy decides. The recorded propensity accounts for both branches:
//! a uniform draw that happens to hit the default action carries the exploit mass too,
//! so the probability is exact rather than the naive `epsilon / K`.

use crate::action::ActionSet;
use crate::decision::{ExploreDecision, Explorer};
use crate::error::ExploreError;
use crate::hash::Prg;
use crate::policy::DefaultPolicy;

/// Configuration for epsilon-greedy exploration.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpsilonGreedyConfig {
    /// Exploration probability in `(0, 1]`.
    pub epsilon: f32,
}

impl Default for EpsilonGreedyConfig {
    fn default() -> Self {
        Self { epsilon: 0.1 }
    }
}

impl EpsilonGreedyConfig {
    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), ExploreError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 || self.epsilon > 1.0 {
            return Err(ExploreError::BadConfig(format!(
                "epsilon must be in (0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Epsilon-greedy explorer around a caller-supplied default policy.
#[derive(Debug, Clone)]
pub struct EpsilonGreedyExplorer<C, S = ()> {
    epsilon: f32,
    default_policy: DefaultPolicy<C, S>,
    explore_enabled: bool,
}

impl<C, S> EpsilonGreedyExplorer<C, S> {
    /// Create an explorer; fails with `BadConfig` on an out-of-range epsilon.
    pub fn new(
        config: EpsilonGreedyConfig,
        default_policy: DefaultPolicy<C, S>,
    ) -> Result<Self, ExploreError> {
        config.validate()?;
        Ok(Self {
            epsilon: config.epsilon,
            default_policy,
            explore_enabled: true,
        })
    }
}

impl<C, S> Explorer<C> for EpsilonGreedyExplorer<C, S> {
    fn choose(
        &mut self,
        context: &C,
        actions: &ActionSet,
        seed: u32,
    ) -> Result<ExploreDecision, ExploreError> {
        let default_action = self.default_policy.invoke(context);
        actions.validate(default_action)?;

        if !self.explore_enabled {
            return Ok(ExploreDecision {
                action: default_action,
                probability: 1.0,
                should_log: false,
            });
        }

        let mut prg = Prg::new(seed);
        let k = actions.count();
        let base = self.epsilon / k as f32;

        let decision = if prg.next_uniform() < self.epsilon {
            let drawn = prg.next_action(k);
            let probability = if drawn == default_action {
                base + (1.0 - self.epsilon)
            } else {
                base
            };
            ExploreDecision {
                action: drawn,
                probability,
                should_log: true,
            }
        } else {
            ExploreDecision {
                action: default_action,
                probability: 1.0 - self.epsilon + base,
                should_log: true,
            }
        };
        Ok(decision)
    }

    fn enable_explore(&mut self, explore: bool) {
        self.explore_enabled = explore;
    }
}
