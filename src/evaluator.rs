//! Offline policy evaluation by inverse propensity scoring.
//!
//! Replays a candidate policy over a logged dataset and averages the importance-weighted
//! rewards of the decisions the candidate agrees with. Only reward-bearing interactions
//! are eligible; the average is over all of them, matched or not, which is what makes
//! the estimate unbiased. Evaluation never mutates the dataset and never touches a
//! logger.

use crate::context::ContextSnapshot;
use crate::interaction::Interaction;
use crate::policy::DefaultPolicy;

/// Inverse-propensity-scored value estimator over a logged dataset.
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator<'a> {
    interactions: &'a [Interaction],
}

impl<'a> PolicyEvaluator<'a> {
    /// Build an evaluator over `interactions` (typically a deserialized export).
    #[must_use]
    pub fn new(interactions: &'a [Interaction]) -> Self {
        Self { interactions }
    }

    /// Estimate the value of `policy` on the logged data:
    ///
    /// `V = (1/|D|) * sum over rewarded i of [policy(ctx_i) == action_i] * r_i / p_i`
    ///
    /// where `D` is the set of reward-bearing interactions. Returns 0.0 when `D` is
    /// empty. Deterministic given the dataset and the policy.
    #[must_use]
    pub fn evaluate_policy<S>(&self, policy: &DefaultPolicy<ContextSnapshot, S>) -> f64 {
        let mut sum = 0.0f64;
        let mut eligible = 0u64;
        for interaction in self.interactions {
            let Some(reward) = interaction.reward() else {
                continue;
            };
            eligible += 1;
            if policy.invoke(interaction.context()) == interaction.action() {
                sum += f64::from(reward) / f64::from(interaction.probability());
            }
        }
        if eligible == 0 {
            0.0
        } else {
            sum / eligible as f64
        }
    }

    /// Number of reward-bearing interactions the estimate averages over.
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.interactions
            .iter()
            .filter(|i| i.reward().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextSnapshot;

    fn rewarded(action: u32, probability: f32, reward: f32) -> Interaction {
        let mut i = Interaction::new(ContextSnapshot::default(), action, probability, 0, 0);
        i.set_reward(reward);
        i
    }

    fn always_one(_ctx: &ContextSnapshot) -> u32 {
        1
    }

    #[test]
    fn averages_importance_weighted_rewards_over_all_eligible() {
        let data = vec![
            rewarded(1, 0.5, 1.0),
            rewarded(2, 0.5, 0.0),
            rewarded(1, 0.25, 2.0),
        ];
        let eval = PolicyEvaluator::new(&data);
        let v = eval.evaluate_policy(&DefaultPolicy::stateless(always_one));
        // (1/0.5 + 0 + 2/0.25) / 3
        assert!((v - 10.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unrewarded_interactions_are_ignored_entirely() {
        let mut data = vec![rewarded(1, 0.5, 1.0)];
        data.push(Interaction::new(ContextSnapshot::default(), 1, 0.5, 0, 0));
        let eval = PolicyEvaluator::new(&data);
        assert_eq!(eval.eligible_count(), 1);
        let v = eval.evaluate_policy(&DefaultPolicy::stateless(always_one));
        assert!((v - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_eligible_set_evaluates_to_zero() {
        let data = vec![Interaction::new(ContextSnapshot::default(), 1, 0.5, 0, 0)];
        let eval = PolicyEvaluator::new(&data);
        assert_eq!(eval.evaluate_policy(&DefaultPolicy::stateless(always_one)), 0.0);
    }

    #[test]
    fn zero_reward_is_eligible_and_dilutes_the_average() {
        let data = vec![rewarded(1, 1.0, 1.0), rewarded(1, 1.0, 0.0)];
        let eval = PolicyEvaluator::new(&data);
        let v = eval.evaluate_policy(&DefaultPolicy::stateless(always_one));
        assert!((v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn stateful_candidate_policies_are_supported() {
        fn pick_state(state: &u32, _ctx: &ContextSnapshot) -> u32 {
            *state
        }
        let data = vec![rewarded(2, 0.5, 1.0)];
        let eval = PolicyEvaluator::new(&data);
        let v = eval.evaluate_policy(&DefaultPolicy::stateful(pick_state, 2u32));
        assert!((v - 2.0).abs() < 1e-9);
    }

    #[test]
    fn evaluation_does_not_mutate_the_dataset() {
        let data = vec![rewarded(1, 0.5, 1.0)];
        let before = data.clone();
        let eval = PolicyEvaluator::new(&data);
        let _ = eval.evaluate_policy(&DefaultPolicy::stateless(always_one));
        assert_eq!(data, before);
    }
}
