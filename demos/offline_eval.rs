//! Log with one policy, join rewards, and evaluate candidates offline.
//!
//! Run with: `cargo run --example offline_eval`

use multiworld::{
    load_interactions, ContextSnapshot, DefaultPolicy, EpsilonGreedyConfig, MwtExplorer,
    PolicyEvaluator, RewardReporter, SimpleContext,
};

fn incumbent(_ctx: &SimpleContext) -> u32 {
    1
}

fn candidate_two(_ctx: &ContextSnapshot) -> u32 {
    2
}

fn candidate_three(_ctx: &ContextSnapshot) -> u32 {
    3
}

// The hidden world: action 2 is best, but the incumbent always picks 1.
fn true_reward(action: u32) -> f32 {
    match action {
        2 => 0.9,
        3 => 0.4,
        _ => 0.1,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut mwt = MwtExplorer::epsilon_greedy(
        "offline-eval",
        EpsilonGreedyConfig { epsilon: 0.6 },
        DefaultPolicy::stateless(incumbent),
        3,
    )?;

    let ctx = SimpleContext::default();
    for i in 0..50_000u32 {
        let unique_id = format!("event-{i}");
        mwt.choose_action(&ctx, &unique_id)?;
    }

    // Rewards arrive later, keyed by the same unique ids.
    let loaded = load_interactions(&mwt.get_all_interactions())?;
    let mut reporter = RewardReporter::new(loaded);
    let pairs: Vec<(u64, f32)> = reporter
        .interactions()
        .iter()
        .map(|i| (i.id_hash(), true_reward(i.action())))
        .collect();
    for (key, reward) in pairs {
        reporter.report_reward_by_key(key, reward);
    }

    let data = reporter.into_interactions();
    let eval = PolicyEvaluator::new(&data);
    println!(
        "always-2 estimate: {:.3} (true 0.9)",
        eval.evaluate_policy(&DefaultPolicy::stateless(candidate_two))
    );
    println!(
        "always-3 estimate: {:.3} (true 0.4)",
        eval.evaluate_policy(&DefaultPolicy::stateless(candidate_three))
    );
    Ok(())
}
