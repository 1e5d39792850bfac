//! Tau-first exploration.
//!
//! The first `tau` decisions are uniform draws with probability `1/K` and are logged;
//! every decision after that collapses to the caller's default policy with probability
//! 1.0 and is not logged. The explored-call counter is the only mutable state any
//! strategy in this crate keeps, and it is updated under the single-writer discipline of
//! the owning explorer.

use crate::action::ActionSet;
use crate::decision::{ExploreDecision, Explorer};
use crate::error::ExploreError;
use crate::hash::Prg;
use crate::policy::DefaultPolicy;

/// Configuration for tau-first exploration.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TauFirstConfig {
    /// Number of leading uniform-exploration decisions. Zero is valid and means the
    /// explorer exploits from the first call.
    pub tau: u32,
}

/// Tau-first explorer around a caller-supplied default policy.
#[derive(Debug, Clone)]
pub struct TauFirstExplorer<C, S = ()> {
    tau: u32,
    explored: u32,
    default_policy: DefaultPolicy<C, S>,
    explore_enabled: bool,
}

impl<C, S> TauFirstExplorer<C, S> {
    /// Create an explorer that explores uniformly for the first `config.tau` calls.
    pub fn new(config: TauFirstConfig, default_policy: DefaultPolicy<C, S>) -> Self {
        Self {
            tau: config.tau,
            explored: 0,
            default_policy,
            explore_enabled: true,
        }
    }

    /// How many exploratory calls have been made so far.
    #[must_use]
    pub fn explored(&self) -> u32 {
        self.explored
    }
}

impl<C, S> Explorer<C> for TauFirstExplorer<C, S> {
    fn choose(
        &mut self,
        context: &C,
        actions: &ActionSet,
        seed: u32,
    ) -> Result<ExploreDecision, ExploreError> {
        if self.explore_enabled && self.explored < self.tau {
            self.explored += 1;
            let k = actions.count();
            let action = Prg::new(seed).next_action(k);
            return Ok(ExploreDecision {
                action,
                probability: 1.0 / k as f32,
                should_log: true,
            });
        }

        let action = self.default_policy.invoke(context);
        actions.validate(action)?;
        Ok(ExploreDecision {
            action,
            probability: 1.0,
            should_log: false,
        })
    }

    fn enable_explore(&mut self, explore: bool) {
        self.explore_enabled = explore;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick_one(_ctx: &u32) -> u32 {
        1
    }

    #[test]
    fn explores_exactly_tau_calls_then_exploits_forever() {
        let actions = ActionSet::new(4).unwrap();
        let mut ex = TauFirstExplorer::new(
            TauFirstConfig { tau: 2 },
            DefaultPolicy::<u32>::stateless(pick_one),
        );

        for i in 0..2u32 {
            let d = ex.choose(&0, &actions, i).unwrap();
            assert!(d.should_log, "call {i} should explore");
            assert!((d.probability - 0.25).abs() < 1e-6);
            assert!(actions.contains(d.action));
        }
        for i in 2..50u32 {
            let d = ex.choose(&0, &actions, i).unwrap();
            assert!(!d.should_log, "call {i} should exploit");
            assert_eq!(d.action, 1);
            assert_eq!(d.probability, 1.0);
        }
        assert_eq!(ex.explored(), 2);
    }

    #[test]
    fn tau_zero_never_explores() {
        let actions = ActionSet::new(3).unwrap();
        let mut ex = TauFirstExplorer::new(
            TauFirstConfig { tau: 0 },
            DefaultPolicy::<u32>::stateless(pick_one),
        );
        let d = ex.choose(&0, &actions, 7).unwrap();
        assert!(!d.should_log);
        assert_eq!(d.action, 1);
    }

    #[test]
    fn exploit_branch_validates_the_policy_action() {
        fn pick_zero(_ctx: &u32) -> u32 {
            0
        }
        let actions = ActionSet::new(3).unwrap();
        let mut ex = TauFirstExplorer::new(
            TauFirstConfig { tau: 0 },
            DefaultPolicy::<u32>::stateless(pick_zero),
        );
        assert!(matches!(
            ex.choose(&0, &actions, 1),
            Err(ExploreError::BadCallerAction { action: 0, .. })
        ));
    }

    #[test]
    fn disabling_exploration_freezes_the_counter() {
        let actions = ActionSet::new(4).unwrap();
        let mut ex = TauFirstExplorer::new(
            TauFirstConfig { tau: 10 },
            DefaultPolicy::<u32>::stateless(pick_one),
        );
        ex.enable_explore(false);
        for seed in 0..20 {
            let d = ex.choose(&0, &actions, seed).unwrap();
            assert!(!d.should_log);
            assert_eq!(d.action, 1);
        }
        assert_eq!(ex.explored(), 0);
    }
}
