//! Score-proportional exploration.
//!
//! Samples an action directly in proportion to the scorer's nonnegative outputs, with no
//! exponential reshaping. All-zero scores fall back to the uniform distribution so the
//! draw always has a valid propensity.

use crate::action::ActionSet;
use crate::decision::{ExploreDecision, Explorer};
use crate::error::ExploreError;
use crate::hash::Prg;
use crate::policy::DefaultScorer;
use crate::softmax::{argmax, sample_index, validate_scores};

/// Generic explorer sampling proportionally to raw scores.
#[derive(Debug, Clone)]
pub struct GenericExplorer<C, S = ()> {
    scorer: DefaultScorer<C, S>,
    explore_enabled: bool,
}

impl<C, S> GenericExplorer<C, S> {
    /// Create an explorer around a caller-supplied scorer.
    pub fn new(scorer: DefaultScorer<C, S>) -> Self {
        Self {
            scorer,
            explore_enabled: true,
        }
    }

    /// The full sampling distribution this explorer would use for `context`.
    pub fn action_probabilities(
        &self,
        context: &C,
        actions: &ActionSet,
    ) -> Result<Vec<f64>, ExploreError> {
        let scores = self.scorer.invoke(context);
        validate_scores(&scores, actions.count())?;

        let total: f64 = scores.iter().map(|&s| f64::from(s)).sum();
        let probs = if total > 0.0 {
            scores.iter().map(|&s| f64::from(s) / total).collect()
        } else {
            vec![1.0 / scores.len() as f64; scores.len()]
        };
        Ok(probs)
    }
}

impl<C, S> Explorer<C> for GenericExplorer<C, S> {
    fn choose(
        &mut self,
        context: &C,
        actions: &ActionSet,
        seed: u32,
    ) -> Result<ExploreDecision, ExploreError> {
        if !self.explore_enabled {
            let scores = self.scorer.invoke(context);
            validate_scores(&scores, actions.count())?;
            let best = argmax(&scores);
            return Ok(ExploreDecision {
                action: best as u32 + 1,
                probability: 1.0,
                should_log: false,
            });
        }

        let probs = self.action_probabilities(context, actions)?;
        let u = f64::from(Prg::new(seed).next_uniform());
        let idx = sample_index(&probs, u);
        Ok(ExploreDecision {
            action: idx as u32 + 1,
            probability: probs[idx] as f32,
            should_log: true,
        })
    }

    fn enable_explore(&mut self, explore: bool) {
        self.explore_enabled = explore;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer_from(state: &Vec<f32>, _ctx: &u32) -> Vec<f32> {
        state.clone()
    }

    fn explorer(scores: Vec<f32>) -> GenericExplorer<u32, Vec<f32>> {
        GenericExplorer::new(DefaultScorer::stateful(scorer_from, scores))
    }

    #[test]
    fn probabilities_are_proportional_to_scores() {
        let actions = ActionSet::new(3).unwrap();
        let ex = explorer(vec![1.0, 1.0, 2.0]);
        let p = ex.action_probabilities(&0, &actions).unwrap();
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.25).abs() < 1e-12);
        assert!((p[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn all_zero_scores_fall_back_to_uniform() {
        let actions = ActionSet::new(4).unwrap();
        let ex = explorer(vec![0.0; 4]);
        let p = ex.action_probabilities(&0, &actions).unwrap();
        for &x in &p {
            assert!((x - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn emitted_probability_matches_the_emitted_action() {
        let actions = ActionSet::new(3).unwrap();
        let mut ex = explorer(vec![3.0, 1.0, 4.0]);
        let p = ex.action_probabilities(&0, &actions).unwrap();
        for seed in 0..200 {
            let d = ex.choose(&0, &actions, seed).unwrap();
            assert!(d.should_log);
            assert!((f64::from(d.probability) - p[(d.action - 1) as usize]).abs() < 1e-6);
        }
    }

    #[test]
    fn wrong_length_scores_are_rejected() {
        let actions = ActionSet::new(3).unwrap();
        let mut ex = explorer(vec![1.0, 2.0]);
        assert!(matches!(
            ex.choose(&0, &actions, 1),
            Err(ExploreError::BadScorerOutput(_))
        ));
    }

    #[test]
    fn disabled_exploration_takes_the_argmax_score() {
        let actions = ActionSet::new(3).unwrap();
        let mut ex = explorer(vec![1.0, 2.0, 9.0]);
        ex.enable_explore(false);
        let d = ex.choose(&0, &actions, 3).unwrap();
        assert_eq!(d.action, 3);
        assert!(!d.should_log);
    }
}
