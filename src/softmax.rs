//! Softmax exploration over a caller-supplied scorer.
//!
//! Weights are exponentiated after shifting by the max score, so large scores cannot
//! overflow. An optional probability floor guards against vanishing propensities, which
//! otherwise blow up importance weights in offline evaluation: after the floor the
//! unfloored mass is rescaled so the distribution still sums to one exactly.

use crate::action::ActionSet;
use crate::decision::{ExploreDecision, Explorer};
use crate::error::ExploreError;
use crate::hash::Prg;
use crate::policy::DefaultScorer;

/// Convergence threshold for the iterative floor redistribution.
const FLOOR_TOLERANCE: f64 = 1e-3;

/// Configuration for softmax exploration.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoftmaxConfig {
    /// Inverse temperature, `>= 0`. Zero yields the uniform distribution.
    pub lambda: f32,
    /// Minimum probability per action, `>= 0`. Zero disables the floor. Must satisfy
    /// `min_probability * K <= 1` for the configured action set.
    pub min_probability: f32,
}

impl Default for SoftmaxConfig {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            min_probability: 0.0,
        }
    }
}

impl SoftmaxConfig {
    /// Validate parameter ranges against an action count.
    pub fn validate(&self, num_actions: u32) -> Result<(), ExploreError> {
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(ExploreError::BadConfig(format!(
                "lambda must be finite and >= 0, got {}",
                self.lambda
            )));
        }
        if !self.min_probability.is_finite() || self.min_probability < 0.0 {
            return Err(ExploreError::BadConfig(format!(
                "min_probability must be finite and >= 0, got {}",
                self.min_probability
            )));
        }
        if f64::from(self.min_probability) * f64::from(num_actions) > 1.0 {
            return Err(ExploreError::BadConfig(format!(
                "min_probability {} is infeasible for {} actions",
                self.min_probability, num_actions
            )));
        }
        Ok(())
    }
}

/// Softmax explorer around a caller-supplied scorer.
#[derive(Debug, Clone)]
pub struct SoftmaxExplorer<C, S = ()> {
    lambda: f32,
    min_probability: f32,
    scorer: DefaultScorer<C, S>,
    explore_enabled: bool,
}

impl<C, S> SoftmaxExplorer<C, S> {
    /// Create an explorer; fails with `BadConfig` on out-of-range parameters.
    ///
    /// `num_actions` is needed up front to reject an infeasible probability floor.
    pub fn new(
        config: SoftmaxConfig,
        scorer: DefaultScorer<C, S>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        config.validate(num_actions)?;
        Ok(Self {
            lambda: config.lambda,
            min_probability: config.min_probability,
            scorer,
            explore_enabled: true,
        })
    }

    /// The full sampling distribution this explorer would use for `context`.
    ///
    /// Exposed so callers can audit propensities without drawing.
    pub fn action_probabilities(
        &self,
        context: &C,
        actions: &ActionSet,
    ) -> Result<Vec<f64>, ExploreError> {
        let scores = self.scorer.invoke(context);
        validate_scores(&scores, actions.count())?;

        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let lambda = f64::from(self.lambda);
        let mut probs: Vec<f64> = scores
            .iter()
            .map(|&s| (lambda * (f64::from(s) - f64::from(max))).exp())
            .collect();
        let total: f64 = probs.iter().sum();
        for p in &mut probs {
            *p /= total;
        }
        if self.min_probability > 0.0 {
            enforce_minimum_probability(&mut probs, f64::from(self.min_probability));
        }
        Ok(probs)
    }
}

impl<C, S> Explorer<C> for SoftmaxExplorer<C, S> {
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

/// Reject wrong-length, NaN, or negative scorer output.
pub(crate) fn validate_scores(scores: &[f32], num_actions: u32) -> Result<(), ExploreError> {
    if scores.len() != num_actions as usize {
        return Err(ExploreError::BadScorerOutput(format!(
            "expected {} scores, got {}",
            num_actions,
            scores.len()
        )));
    }
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            return Err(ExploreError::BadScorerOutput(format!(
                "score for action {} is NaN",
                i + 1
            )));
        }
        if s < 0.0 {
            return Err(ExploreError::BadScorerOutput(format!(
                "score for action {} is negative ({s})",
                i + 1
            )));
        }
    }
    Ok(())
}

/// Index of the highest score; ties resolve to the lowest index.
pub(crate) fn argmax(scores: &[f32]) -> usize {
    let mut best = 0usize;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

/// Walk the CDF of `probs` for uniform draw `u`, falling back to the last index if
/// rounding leaves the CDF short of 1.
pub(crate) fn sample_index(probs: &[f64], u: f64) -> usize {
    let mut cdf = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cdf += p;
        if u < cdf {
            return i;
        }
    }
    probs.len() - 1
}

/// Raise every probability to at least `min_probability`, taking the added mass from the
/// unfloored entries.
///
/// The redistribution loop runs until the mass still being added per pass is below
/// [`FLOOR_TOLERANCE`]; a final pass then rescales the unfloored entries exactly, so the
/// result both sums to one and respects the floor. Assumes
/// `min_probability * probs.len() <= 1` (checked at configuration time).
fn enforce_minimum_probability(probs: &mut [f64], min_probability: f64) {
    loop {
        let added: f64 = probs
            .iter()
            .map(|&p| (min_probability - p).max(0.0))
            .sum();
        if added / (1.0 + added) < FLOOR_TOLERANCE {
            break;
        }
        for p in probs.iter_mut() {
            if *p <= min_probability {
                *p = min_probability;
            } else {
                *p /= 1.0 + added;
            }
        }
    }

    // Exact rebalance: pin the floored entries and scale the rest to the leftover mass.
    // Rescaling can push a borderline entry under the floor, so repeat until stable;
    // the floored set only grows, so this terminates within `probs.len()` passes.
    loop {
        let floored = probs.iter().filter(|&&p| p <= min_probability).count();
        let rest: f64 = probs.iter().filter(|&&p| p > min_probability).sum();
        if rest <= 0.0 {
            break;
        }
        let scale = (1.0 - floored as f64 * min_probability) / rest;
        let mut stable = true;
        for p in probs.iter_mut() {
            if *p <= min_probability {
                *p = min_probability;
            } else {
                *p *= scale;
                if *p < min_probability {
                    stable = false;
                }
            }
        }
        if stable {
            break;
        }
    }
}
