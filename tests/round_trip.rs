//! Serialization round-trips and corrupt-stream handling for the interaction log.

use multiworld::{
    load_interactions, load_interactions_text, ContextSnapshot, DefaultPolicy,
    EpsilonGreedyConfig, ExploreError, Feature, Interaction, MwtExplorer, SimpleContext,
};

fn pick_one(_ctx: &SimpleContext) -> u32 {
    1
}

fn populated_log() -> Vec<u8> {
    let mut mwt = MwtExplorer::epsilon_greedy(
        "rt",
        EpsilonGreedyConfig { epsilon: 0.5 },
        DefaultPolicy::stateless(pick_one),
        4,
    )
    .unwrap();
    let ctx = SimpleContext::new(vec![
        Feature { index: 2, value: 0.5 },
        Feature { index: 9, value: -3.25 },
    ])
    .with_other_context("query=rust bandits");
    for i in 0..20 {
        let unique_id = format!("rt-{i}");
        mwt.choose_action(&ctx, &unique_id).unwrap();
    }
    mwt.get_all_interactions()
}

#[test]
fn binary_export_reloads_identically() {
    let bytes = populated_log();
    let first = load_interactions(&bytes).unwrap();
    assert_eq!(first.len(), 20);

    // Re-serialize and reload: byte-for-byte and value-for-value stable.
    let mut again = Vec::new();
    for i in &first {
        i.write_binary(&mut again);
    }
    assert_eq!(again, bytes);
    assert_eq!(load_interactions(&again).unwrap(), first);
}

#[test]
fn text_export_reloads_identically() {
    let bytes = populated_log();
    let records = load_interactions(&bytes).unwrap();

    let mut text = String::new();
    for r in &records {
        r.write_text(&mut text);
        text.push('\n');
    }
    let reloaded = load_interactions_text(&text).unwrap();
    assert_eq!(reloaded, records);
}

#[test]
fn unset_rewards_survive_both_codecs() {
    let mut with_reward = Interaction::new(
        ContextSnapshot {
            features: vec![Feature { index: 1, value: 1.0 }],
            other_context: None,
        },
        2,
        0.25,
        77,
        123,
    );
    let without_reward = with_reward.clone();
    with_reward.set_reward(0.0);

    let mut buf = Vec::new();
    with_reward.write_binary(&mut buf);
    without_reward.write_binary(&mut buf);
    let loaded = load_interactions(&buf).unwrap();
    assert_eq!(loaded[0].reward(), Some(0.0));
    assert_eq!(loaded[1].reward(), None);

    let mut text = String::new();
    with_reward.write_text(&mut text);
    text.push('\n');
    without_reward.write_text(&mut text);
    let loaded = load_interactions_text(&text).unwrap();
    assert_eq!(loaded[0].reward(), Some(0.0));
    assert_eq!(loaded[1].reward(), None);
}

#[test]
fn truncation_anywhere_is_detected() {
    let bytes = populated_log();
    // Chop the stream at a few arbitrary depths; every cut must surface as corruption,
    // never as a short-but-plausible load.
    for cut in [1, 7, bytes.len() / 2, bytes.len() - 1] {
        let r = load_interactions(&bytes[..cut]);
        assert!(
            matches!(r, Err(ExploreError::CorruptInteractionStream(_))),
            "cut at {cut} did not error"
        );
    }
}

#[test]
fn version_byte_gates_every_record() {
    let mut bytes = populated_log();
    bytes[0] = 2;
    assert!(matches!(
        load_interactions(&bytes),
        Err(ExploreError::CorruptInteractionStream(_))
    ));
}

#[test]
fn invalid_probability_in_text_is_rejected() {
    let line = "1 1 42 2 0.0 7 0 - NaN";
    assert!(matches!(
        Interaction::parse_text(line),
        Err(ExploreError::CorruptInteractionStream(_))
    ));

    let line = "1 1 42 2 1.5 7 0 - NaN";
    assert!(matches!(
        Interaction::parse_text(line),
        Err(ExploreError::CorruptInteractionStream(_))
    ));
}

#[test]
fn text_parses_a_hand_written_record() {
    // 1 feature (index 3, value 1.5), no other context, reward 2.
    let line = "1 5 42 2 0.5 7 1 3 1.5 - 2";
    let r = Interaction::parse_text(line).unwrap();
    assert_eq!(r.id(), 5);
    assert_eq!(r.id_hash(), 42);
    assert_eq!(r.action(), 2);
    assert_eq!(r.probability(), 0.5);
    assert_eq!(r.seed(), 7);
    assert_eq!(r.context().features, vec![Feature { index: 3, value: 1.5 }]);
    assert_eq!(r.context().other_context, None);
    assert_eq!(r.reward(), Some(2.0));
}

#[cfg(feature = "serde")]
#[test]
fn interaction_serde_round_trips_as_json() {
    let mut record = Interaction::new(
        ContextSnapshot {
            features: vec![Feature { index: 4, value: 0.125 }],
            other_context: Some("shard=3".into()),
        },
        3,
        0.75,
        9,
        555,
    );
    record.set_reward(1.25);

    let json = serde_json::to_string(&record).unwrap();
    let back: Interaction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
