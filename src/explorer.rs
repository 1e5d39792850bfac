//! The explorer façade: one strategy, one action set, one interaction log.
//!
//! `MwtExplorer` binds an application id, an exploration strategy, and an append-only
//! log. Decisions are seeded exclusively from the caller-supplied unique id, so a
//! decision is reproducible anywhere the same id and configuration meet; nothing is
//! drawn from a global randomness source. One instance is single-writer: share nothing,
//! or build one explorer per worker and merge exported logs.

use rand::Rng as _;

use crate::action::{Action, ActionSet};
use crate::bagging::BaggingExplorer;
use crate::context::ExploreContext;
use crate::decision::Explorer;
use crate::epsilon_greedy::{EpsilonGreedyConfig, EpsilonGreedyExplorer};
use crate::error::ExploreError;
use crate::generic::GenericExplorer;
use crate::hash::{id_hash, uniform_hash};
use crate::interaction::Interaction;
use crate::logger::InteractionLogger;
use crate::policy::{DefaultPolicy, DefaultScorer};
use crate::softmax::{SoftmaxConfig, SoftmaxExplorer};
use crate::tau_first::{TauFirstConfig, TauFirstExplorer};

/// Join key returned by [`MwtExplorer::choose_action_and_key`] for draws that were not
/// logged. Log ids start at 1, so 0 never collides.
pub const NO_JOIN_KEY: u64 = 0;

/// Top-level exploration interface over a caller context type `C`.
pub struct MwtExplorer<C> {
    app_id: String,
    actions: ActionSet,
    strategy: Box<dyn Explorer<C>>,
    logger: InteractionLogger,
}

impl<C: ExploreContext + 'static> MwtExplorer<C> {
    /// Epsilon-greedy exploration over `num_actions` actions.
    pub fn epsilon_greedy<S: 'static>(
        app_id: impl Into<String>,
        config: EpsilonGreedyConfig,
        default_policy: DefaultPolicy<C, S>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        let strategy = EpsilonGreedyExplorer::new(config, default_policy)?;
        Self::with_strategy(app_id.into(), num_actions, Box::new(strategy))
    }

    /// Tau-first exploration over `num_actions` actions.
    pub fn tau_first<S: 'static>(
        app_id: impl Into<String>,
        config: TauFirstConfig,
        default_policy: DefaultPolicy<C, S>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        let strategy = TauFirstExplorer::new(config, default_policy);
        Self::with_strategy(app_id.into(), num_actions, Box::new(strategy))
    }

    /// Bootstrap bagging over `num_actions` actions.
    pub fn bagging<S: 'static>(
        app_id: impl Into<String>,
        default_policies: Vec<DefaultPolicy<C, S>>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        let strategy = BaggingExplorer::new(default_policies)?;
        Self::with_strategy(app_id.into(), num_actions, Box::new(strategy))
    }

    /// Softmax exploration over `num_actions` actions.
    pub fn softmax<S: 'static>(
        app_id: impl Into<String>,
        config: SoftmaxConfig,
        default_scorer: DefaultScorer<C, S>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        let strategy = SoftmaxExplorer::new(config, default_scorer, num_actions)?;
        Self::with_strategy(app_id.into(), num_actions, Box::new(strategy))
    }

    /// Score-proportional exploration over `num_actions` actions.
    pub fn generic<S: 'static>(
        app_id: impl Into<String>,
        default_scorer: DefaultScorer<C, S>,
        num_actions: u32,
    ) -> Result<Self, ExploreError> {
        let strategy = GenericExplorer::new(default_scorer);
        Self::with_strategy(app_id.into(), num_actions, Box::new(strategy))
    }

    fn with_strategy(
        app_id: String,
        num_actions: u32,
        strategy: Box<dyn Explorer<C>>,
    ) -> Result<Self, ExploreError> {
        let actions = ActionSet::new(num_actions)?;
        let app_id = resolve_app_id(app_id);
        tracing::debug!(app_id = %app_id, num_actions, "explorer created");
        Ok(Self {
            logger: InteractionLogger::new(app_id.clone()),
            app_id,
            actions,
            strategy,
        })
    }

    /// The application tag (generated when the caller passed an empty one).
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The action set decisions are made over.
    #[must_use]
    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Toggle the strategy's randomization branch.
    pub fn enable_explore(&mut self, explore: bool) {
        self.strategy.enable_explore(explore);
    }

    /// Choose an action for `context`, seeded by `unique_id`.
    ///
    /// Appends to the internal log iff the draw was randomized. Two calls with the same
    /// unique id on identically configured explorers return the same action.
    pub fn choose_action(&mut self, context: &C, unique_id: &str) -> Result<Action, ExploreError> {
        if unique_id.is_empty() {
            return Err(ExploreError::EmptyUniqueId);
        }
        let hashed = id_hash(unique_id);
        let seed = hashed as u32;

        let decision = self.strategy.choose(context, &self.actions, seed)?;
        if decision.should_log {
            let interaction = Interaction::new(
                context.snapshot(),
                decision.action,
                decision.probability,
                seed,
                hashed,
            );
            let id = self.logger.store(interaction);
            tracing::debug!(
                app_id = %self.app_id,
                id,
                action = decision.action,
                probability = f64::from(decision.probability),
                "logged exploration decision"
            );
        } else {
            tracing::debug!(
                app_id = %self.app_id,
                action = decision.action,
                "unlogged default decision"
            );
        }
        Ok(decision.action)
    }

    /// Choose an action and let the library assign the reward-join key.
    ///
    /// The key doubles as the log id; the stored record's `id_hash` equals the key, so
    /// rewards can be reported against `key.to_string()` or the key itself. Unlogged
    /// draws return [`NO_JOIN_KEY`]. Seeds derive from the application id and the call
    /// position, keeping this path reproducible per explorer.
    pub fn choose_action_and_key(&mut self, context: &C) -> Result<(Action, u64), ExploreError> {
        let key = self.logger.next_id();
        let seed = uniform_hash(self.app_id.as_bytes(), key as u32);

        let decision = self.strategy.choose(context, &self.actions, seed)?;
        if decision.should_log {
            let interaction = Interaction::new(
                context.snapshot(),
                decision.action,
                decision.probability,
                seed,
                key,
            );
            let id = self.logger.store(interaction);
            tracing::debug!(
                app_id = %self.app_id,
                id,
                action = decision.action,
                "logged key-assigned decision"
            );
            Ok((decision.action, id))
        } else {
            Ok((decision.action, NO_JOIN_KEY))
        }
    }

    /// All logged interactions, in append order.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        self.logger.interactions()
    }

    /// The full log, binary-serialized.
    #[must_use]
    pub fn get_all_interactions(&self) -> Vec<u8> {
        self.logger.to_bytes()
    }

    /// The full log in text form.
    #[must_use]
    pub fn get_all_interactions_text(&self) -> String {
        self.logger.to_text()
    }

    /// The underlying logger.
    #[must_use]
    pub fn logger(&self) -> &InteractionLogger {
        &self.logger
    }
}

fn resolve_app_id(app_id: String) -> String {
    if app_id.is_empty() {
        format!("app-{:016x}", rand::rng().random::<u64>())
    } else {
        app_id
    }
}
