//! The logged interaction record and its two codecs.
//!
//! An interaction is immutable once logged, except for its reward, which the reward
//! reporter joins in later. Both codecs are lossless round-trips, including the
//! distinction between "no reward yet" and "reward of zero": binary uses a NaN sentinel
//! in the reward slot, text a literal `NaN` token.
//!
//! Binary layout per record, little-endian after a leading version byte:
//! `u8 version, u64 id, u64 id_hash, u32 action, f32 probability, u32 seed,
//! u32 feature_count, feature_count x (u32 index, f32 value), u32 other_len,
//! other_len bytes, f32 reward-or-NaN`.
//!
//! The text form carries the same fields whitespace-delimited, one record per line, with
//! the auxiliary context hex-encoded (`-` when absent) so arbitrary content stays on one
//! line.

use std::fmt::Write as _;

use crate::action::Action;
use crate::context::{ContextSnapshot, Feature};
use crate::error::ExploreError;

/// Version byte at the head of every binary record.
pub const BINARY_FORMAT_VERSION: u8 = 1;

/// One logged exploration decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    id: u64,
    id_hash: u64,
    context: ContextSnapshot,
    action: Action,
    probability: f32,
    seed: u32,
    reward: Option<f32>,
}

impl Interaction {
    /// Build a record for a logged draw. The log id is assigned when the record is
    /// stored.
    #[must_use]
    pub fn new(
        context: ContextSnapshot,
        action: Action,
        probability: f32,
        seed: u32,
        id_hash: u64,
    ) -> Self {
        Self {
            id: 0,
            id_hash,
            context,
            action,
            probability,
            seed,
            reward: None,
        }
    }

    /// Log-assigned id, unique and append-ordered within one log.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Hash of the unique id this decision was made under; the reward-join key.
    #[must_use]
    pub fn id_hash(&self) -> u64 {
        self.id_hash
    }

    /// The logged context snapshot.
    #[must_use]
    pub fn context(&self) -> &ContextSnapshot {
        &self.context
    }

    /// The emitted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// The exact propensity the action was drawn under.
    #[must_use]
    pub fn probability(&self) -> f32 {
        self.probability
    }

    /// The seed the draw was made under.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The joined reward, if one has been reported.
    #[must_use]
    pub fn reward(&self) -> Option<f32> {
        self.reward
    }

    /// Attach a reward to this interaction.
    pub fn set_reward(&mut self, reward: f32) {
        self.reward = Some(reward);
    }

    pub(crate) fn assign_id(&mut self, id: u64) {
        self.id = id;
    }

    /// Append this record's binary form to `out`.
    pub fn write_binary(&self, out: &mut Vec<u8>) {
        out.push(BINARY_FORMAT_VERSION);
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.id_hash.to_le_bytes());
        out.extend_from_slice(&self.action.to_le_bytes());
        out.extend_from_slice(&self.probability.to_le_bytes());
        out.extend_from_slice(&self.seed.to_le_bytes());
        out.extend_from_slice(&(self.context.features.len() as u32).to_le_bytes());
        for f in &self.context.features {
            out.extend_from_slice(&f.index.to_le_bytes());
            out.extend_from_slice(&f.value.to_le_bytes());
        }
        let other = self.context.other_context.as_deref().unwrap_or("");
        out.extend_from_slice(&(other.len() as u32).to_le_bytes());
        out.extend_from_slice(other.as_bytes());
        out.extend_from_slice(&self.reward.unwrap_or(f32::NAN).to_le_bytes());
    }

    /// Decode one record from the front of `input`, advancing it past the record.
    pub fn read_binary(input: &mut &[u8]) -> Result<Self, ExploreError> {
        let version = take(input, 1)?[0];
        if version != BINARY_FORMAT_VERSION {
            return Err(ExploreError::CorruptInteractionStream(format!(
                "unknown record version {version}"
            )));
        }

        let id = read_u64(input)?;
        let id_hash = read_u64(input)?;
        let action = read_u32(input)?;
        let probability = read_f32(input)?;
        let seed = read_u32(input)?;

        let feature_count = read_u32(input)? as usize;
        if input.len() < feature_count.saturating_mul(8) {
            return Err(ExploreError::CorruptInteractionStream(format!(
                "feature count {feature_count} exceeds remaining stream"
            )));
        }
        let mut features = Vec::with_capacity(feature_count);
        for _ in 0..feature_count {
            let index = read_u32(input)?;
            let value = read_f32(input)?;
            features.push(Feature { index, value });
        }

        let other_len = read_u32(input)? as usize;
        let other_bytes = take(input, other_len)?;
        let other_context = if other_bytes.is_empty() {
            None
        } else {
            Some(String::from_utf8(other_bytes.to_vec()).map_err(|_| {
                ExploreError::CorruptInteractionStream("other-context is not UTF-8".into())
            })?)
        };

        let reward_raw = read_f32(input)?;
        let reward = if reward_raw.is_nan() {
            None
        } else {
            Some(reward_raw)
        };

        let record = Self {
            id,
            id_hash,
            context: ContextSnapshot {
                features,
                other_context,
            },
            action,
            probability,
            seed,
            reward,
        };
        record.check_invariants()?;
        Ok(record)
    }

    /// Append this record's text form (one line, no trailing newline) to `out`.
    pub fn write_text(&self, out: &mut String) {
        let _ = write!(
            out,
            "{} {} {} {} {} {} {}",
            BINARY_FORMAT_VERSION,
            self.id,
            self.id_hash,
            self.action,
            self.probability,
            self.seed,
            self.context.features.len()
        );
        for f in &self.context.features {
            let _ = write!(out, " {} {}", f.index, f.value);
        }
        match self.context.other_context.as_deref() {
            Some(s) if !s.is_empty() => {
                out.push(' ');
                for b in s.as_bytes() {
                    let _ = write!(out, "{b:02x}");
                }
            }
            _ => out.push_str(" -"),
        }
        match self.reward {
            Some(r) => {
                let _ = write!(out, " {r}");
            }
            None => out.push_str(" NaN"),
        }
    }

    /// Parse one text-form record.
    pub fn parse_text(line: &str) -> Result<Self, ExploreError> {
        let mut tokens = line.split_whitespace();
        let mut next = |what: &str| {
            tokens.next().ok_or_else(|| {
                ExploreError::CorruptInteractionStream(format!("record ends before {what}"))
            })
        };

        let version: u8 = parse_token(next("version")?, "version")?;
        if version != BINARY_FORMAT_VERSION {
            return Err(ExploreError::CorruptInteractionStream(format!(
                "unknown record version {version}"
            )));
        }
        let id: u64 = parse_token(next("id")?, "id")?;
        let id_hash: u64 = parse_token(next("id hash")?, "id hash")?;
        let action: u32 = parse_token(next("action")?, "action")?;
        let probability: f32 = parse_token(next("probability")?, "probability")?;
        let seed: u32 = parse_token(next("seed")?, "seed")?;

        let feature_count: usize = parse_token(next("feature count")?, "feature count")?;
        let mut features = Vec::with_capacity(feature_count.min(1024));
        for _ in 0..feature_count {
            let index: u32 = parse_token(next("feature index")?, "feature index")?;
            let value: f32 = parse_token(next("feature value")?, "feature value")?;
            features.push(Feature { index, value });
        }

        let other_token = next("other-context")?;
        let other_context = if other_token == "-" {
            None
        } else {
            Some(decode_hex_string(other_token)?)
        };

        let reward_token = next("reward")?;
        let reward = if reward_token.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(parse_token::<f32>(reward_token, "reward")?)
        };

        if tokens.next().is_some() {
            return Err(ExploreError::CorruptInteractionStream(
                "trailing tokens after reward".into(),
            ));
        }

        let record = Self {
            id,
            id_hash,
            context: ContextSnapshot {
                features,
                other_context,
            },
            action,
            probability,
            seed,
            reward,
        };
        record.check_invariants()?;
        Ok(record)
    }

    fn check_invariants(&self) -> Result<(), ExploreError> {
        if !(self.probability > 0.0 && self.probability <= 1.0) {
            return Err(ExploreError::CorruptInteractionStream(format!(
                "probability {} outside (0, 1]",
                self.probability
            )));
        }
        if self.action == 0 {
            return Err(ExploreError::CorruptInteractionStream(
                "action id 0 is not valid".into(),
            ));
        }
        Ok(())
    }
}

fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], ExploreError> {
    if input.len() < n {
        return Err(ExploreError::CorruptInteractionStream(
            "unexpected end of stream".into(),
        ));
    }
    let (head, rest) = input.split_at(n);
    *input = rest;
    Ok(head)
}

fn read_u32(input: &mut &[u8]) -> Result<u32, ExploreError> {
    let b = take(input, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_u64(input: &mut &[u8]) -> Result<u64, ExploreError> {
    let b = take(input, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

fn read_f32(input: &mut &[u8]) -> Result<f32, ExploreError> {
    Ok(f32::from_bits(read_u32(input)?))
}

fn parse_token<T: std::str::FromStr>(token: &str, what: &str) -> Result<T, ExploreError> {
    token.parse().map_err(|_| {
        ExploreError::CorruptInteractionStream(format!("cannot parse {what} from {token:?}"))
    })
}

fn decode_hex_string(token: &str) -> Result<String, ExploreError> {
    if token.len() % 2 != 0 {
        return Err(ExploreError::CorruptInteractionStream(
            "odd-length hex in other-context".into(),
        ));
    }
    let mut bytes = Vec::with_capacity(token.len() / 2);
    for i in (0..token.len()).step_by(2) {
        let pair = token.get(i..i + 2).ok_or_else(|| {
            ExploreError::CorruptInteractionStream("malformed hex in other-context".into())
        })?;
        let b = u8::from_str_radix(pair, 16).map_err(|_| {
            ExploreError::CorruptInteractionStream(format!("invalid hex pair {pair:?}"))
        })?;
        bytes.push(b);
    }
    String::from_utf8(bytes)
        .map_err(|_| ExploreError::CorruptInteractionStream("other-context is not UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Interaction {
        let mut i = Interaction::new(
            ContextSnapshot {
                features: vec![
                    Feature { index: 3, value: 1.5 },
                    Feature {
                        index: 12,
                        value: -0.25,
                    },
                ],
                other_context: Some("region=eu west".into()),
            },
            2,
            0.625,
            0xdead_beef,
            42,
        );
        i.assign_id(7);
        i
    }

    #[test]
    fn binary_round_trip_without_reward() {
        let original = sample();
        let mut buf = Vec::new();
        original.write_binary(&mut buf);

        let mut slice = buf.as_slice();
        let decoded = Interaction::read_binary(&mut slice).unwrap();
        assert!(slice.is_empty());
        assert_eq!(decoded, original);
        assert_eq!(decoded.reward(), None);
    }

    #[test]
    fn binary_round_trip_distinguishes_zero_reward() {
        let mut original = sample();
        original.set_reward(0.0);
        let mut buf = Vec::new();
        original.write_binary(&mut buf);

        let decoded = Interaction::read_binary(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.reward(), Some(0.0));
    }

    #[test]
    fn text_round_trip_preserves_spaces_in_other_context() {
        let original = sample();
        let mut line = String::new();
        original.write_text(&mut line);
        assert_eq!(line.lines().count(), 1);

        let decoded = Interaction::parse_text(&line).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(
            decoded.context().other_context.as_deref(),
            Some("region=eu west")
        );
    }

    #[test]
    fn truncated_binary_stream_is_corrupt() {
        let original = sample();
        let mut buf = Vec::new();
        original.write_binary(&mut buf);
        buf.truncate(buf.len() - 3);

        assert!(matches!(
            Interaction::read_binary(&mut buf.as_slice()),
            Err(ExploreError::CorruptInteractionStream(_))
        ));
    }

    #[test]
    fn unknown_version_is_corrupt() {
        let original = sample();
        let mut buf = Vec::new();
        original.write_binary(&mut buf);
        buf[0] = 99;

        assert!(matches!(
            Interaction::read_binary(&mut buf.as_slice()),
            Err(ExploreError::CorruptInteractionStream(_))
        ));
    }

    #[test]
    fn out_of_range_probability_is_corrupt() {
        let bad = Interaction::new(ContextSnapshot::default(), 1, 1.5, 0, 0);
        let mut buf = Vec::new();
        bad.write_binary(&mut buf);
        assert!(matches!(
            Interaction::read_binary(&mut buf.as_slice()),
            Err(ExploreError::CorruptInteractionStream(_))
        ));

        let mut line = String::new();
        bad.write_text(&mut line);
        assert!(matches!(
            Interaction::parse_text(&line),
            Err(ExploreError::CorruptInteractionStream(_))
        ));
    }

    #[test]
    fn oversized_feature_count_is_rejected_before_allocation() {
        let mut buf = Vec::new();
        sample().write_binary(&mut buf);
        // Patch the feature count (offset: 1 version + 8 id + 8 hash + 4 action
        // + 4 probability + 4 seed) to an absurd value.
        let off = 1 + 8 + 8 + 4 + 4 + 4;
        buf[off..off + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            Interaction::read_binary(&mut buf.as_slice()),
            Err(ExploreError::CorruptInteractionStream(_))
        ));
    }

    #[test]
    fn text_rejects_trailing_tokens() {
        let mut line = String::new();
        sample().write_text(&mut line);
        line.push_str(" extra");
        assert!(matches!(
            Interaction::parse_text(&line),
            Err(ExploreError::CorruptInteractionStream(_))
        ));
    }
}
