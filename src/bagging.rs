//! Bootstrap bagging exploration.
//!
//! Every bag policy votes on the context, one bag is drawn uniformly, and the emitted
//! action's propensity is its exact vote share. That vote share is what keeps
//! inverse-propensity estimates over bagged logs unbiased, so all bags are evaluated on
//! every call even though only one decides.

use crate::action::ActionSet;
use crate::decision::{ExploreDecision, Explorer};
use crate::error::ExploreError;
use crate::hash::Prg;
use crate::policy::DefaultPolicy;

/// Bagging explorer over `N >= 1` caller-supplied policies.
#[derive(Debug, Clone)]
pub struct BaggingExplorer<C, S = ()> {
    bags: Vec<DefaultPolicy<C, S>>,
    explore_enabled: bool,
}

impl<C, S> BaggingExplorer<C, S> {
    /// Create an explorer; fails with `BadConfig` on an empty bag list.
    pub fn new(bags: Vec<DefaultPolicy<C, S>>) -> Result<Self, ExploreError> {
        if bags.is_empty() {
            return Err(ExploreError::BadConfig(
                "bagging requires at least one policy".into(),
            ));
        }
        Ok(Self {
            bags,
            explore_enabled: true,
        })
    }

    /// Number of bags.
    #[must_use]
    pub fn num_bags(&self) -> usize {
        self.bags.len()
    }
}

impl<C, S> Explorer<C> for BaggingExplorer<C, S> {
    fn choose(
        &mut self,
        context: &C,
        actions: &ActionSet,
        seed: u32,
    ) -> Result<ExploreDecision, ExploreError> {
        if !self.explore_enabled {
            let action = self.bags[0].invoke(context);
            actions.validate(action)?;
            return Ok(ExploreDecision {
                action,
                probability: 1.0,
                should_log: false,
            });
        }

        let mut votes = Vec::with_capacity(self.bags.len());
        for bag in &self.bags {
            let action = bag.invoke(context);
            actions.validate(action)?;
            votes.push(action);
        }

        let mut prg = Prg::new(seed);
        let chosen_bag = prg.next_action(votes.len() as u32) as usize - 1;
        let action = votes[chosen_bag];
        let share = votes.iter().filter(|&&a| a == action).count() as f32;

        Ok(ExploreDecision {
            action,
            probability: share / votes.len() as f32,
            should_log: true,
        })
    }

    fn enable_explore(&mut self, explore: bool) {
        self.explore_enabled = explore;
    }
}
