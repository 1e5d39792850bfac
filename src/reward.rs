//! Joining rewards to logged interactions.
//!
//! The reporter owns a flat interaction set (typically a deserialized export) and
//! indexes it by the unique-id hash, so rewards can be streamed in keyed either by the
//! original unique-id string or by the 64-bit key directly. Reporting against an absent
//! id is not an error; it returns `false`, so callers never need to pre-filter their
//! reward stream. Interactions that never receive a reward stay in the set and remain
//! visible on export.

use std::collections::BTreeMap;

use crate::hash::id_hash;
use crate::interaction::Interaction;

/// Keyed reward joiner over a loaded interaction set.
#[derive(Debug, Clone)]
pub struct RewardReporter {
    interactions: Vec<Interaction>,
    index: BTreeMap<u64, Vec<usize>>,
}

impl RewardReporter {
    /// Build a reporter over `interactions`, indexing by their unique-id hashes.
    #[must_use]
    pub fn new(interactions: Vec<Interaction>) -> Self {
        let mut index: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
        for (pos, interaction) in interactions.iter().enumerate() {
            index.entry(interaction.id_hash()).or_default().push(pos);
        }
        Self {
            interactions,
            index,
        }
    }

    /// Report a reward by unique-id string. Returns whether any interaction matched.
    pub fn report_reward(&mut self, unique_id: &str, reward: f32) -> bool {
        self.report_reward_by_key(id_hash(unique_id), reward)
    }

    /// Report a reward by 64-bit join key. Every interaction under the key receives the
    /// reward. Returns whether any interaction matched.
    pub fn report_reward_by_key(&mut self, key: u64, reward: f32) -> bool {
        match self.index.get(&key) {
            Some(positions) => {
                for &pos in positions {
                    self.interactions[pos].set_reward(reward);
                }
                tracing::debug!(
                    key,
                    reward = f64::from(reward),
                    matched = positions.len(),
                    "reward joined"
                );
                true
            }
            None => {
                tracing::debug!(key, "no interaction for reward");
                false
            }
        }
    }

    /// Report rewards over parallel key/reward slices. Returns true iff the slices have
    /// equal length and **every** key matched.
    pub fn report_rewards(&mut self, keys: &[u64], rewards: &[f32]) -> bool {
        let mut all_matched = keys.len() == rewards.len();
        for (&key, &reward) in keys.iter().zip(rewards) {
            all_matched &= self.report_reward_by_key(key, reward);
        }
        all_matched
    }

    /// The interaction set, including unrewarded entries.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Consume the reporter, returning the (possibly reward-bearing) interaction set.
    #[must_use]
    pub fn into_interactions(self) -> Vec<Interaction> {
        self.interactions
    }

    /// The full set in binary form, rewarded or not.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for interaction in &self.interactions {
            interaction.write_binary(&mut buf);
        }
        buf
    }
}
