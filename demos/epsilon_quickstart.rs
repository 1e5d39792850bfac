//! Minimal epsilon-greedy decision loop with propensity logging.
//!
//! Run with: `cargo run --example epsilon_quickstart`

use multiworld::{
    DefaultPolicy, EpsilonGreedyConfig, Feature, MwtExplorer, SimpleContext,
};

fn newest_first(_ctx: &SimpleContext) -> u32 {
    1
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three ranking variants; variant 1 is the incumbent the default policy exploits.
    let mut mwt = MwtExplorer::epsilon_greedy(
        "quickstart",
        EpsilonGreedyConfig { epsilon: 0.25 },
        DefaultPolicy::stateless(newest_first),
        3,
    )?;

    for request in 0..10u32 {
        let ctx = SimpleContext::new(vec![Feature {
            index: 1,
            value: request as f32,
        }]);
        let unique_id = format!("request-{request}");
        let action = mwt.choose_action(&ctx, &unique_id)?;
        println!("{unique_id}: variant {action}");
    }

    println!("\nlogged {} interactions:", mwt.interactions().len());
    print!("{}", mwt.get_all_interactions_text());
    Ok(())
}
