//! Caller callback adapters: default policies and scorers, stateless or stateful.
//!
//! Both callback kinds come in two shapes. The stateless shape is a plain function of
//! the context; the stateful shape carries caller-owned state that is handed back on
//! every invocation. The shapes are tagged variants, so there is no downcasting on the
//! decision path, and invocation itself is infallible: range and shape validation of the
//! returned value happens inside the explorers, where the action set is known.

use std::fmt;

use crate::action::Action;

/// A deterministic default policy: context in, action id out.
///
/// The explorers treat the returned id as untrusted and validate it against the action
/// set; an out-of-range id surfaces as
/// [`ExploreError::BadCallerAction`](crate::ExploreError::BadCallerAction).
pub enum DefaultPolicy<C, S = ()> {
    /// A plain function of the context.
    Stateless(fn(&C) -> Action),
    /// A function of caller state plus context. The state is owned by the adapter and
    /// passed back on every call; it is never inspected by the library.
    Stateful { func: fn(&S, &C) -> Action, state: S },
}

impl<C> DefaultPolicy<C> {
    /// Wrap a stateless policy function.
    ///
    /// Pins the state parameter to `()`; to mix stateless callbacks into a stateful
    /// bag, use the [`DefaultPolicy::Stateless`] variant directly.
    #[must_use]
    pub fn stateless(func: fn(&C) -> Action) -> Self {
        Self::Stateless(func)
    }
}

impl<C, S> DefaultPolicy<C, S> {
    /// Wrap a stateful policy function with its state.
    #[must_use]
    pub fn stateful(func: fn(&S, &C) -> Action, state: S) -> Self {
        Self::Stateful { func, state }
    }

    /// Invoke the wrapped callback.
    pub fn invoke(&self, context: &C) -> Action {
        match self {
            Self::Stateless(func) => func(context),
            Self::Stateful { func, state } => func(state, context),
        }
    }
}

impl<C, S: Clone> Clone for DefaultPolicy<C, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Stateless(func) => Self::Stateless(*func),
            Self::Stateful { func, state } => Self::Stateful {
                func: *func,
                state: state.clone(),
            },
        }
    }
}

impl<C, S> fmt::Debug for DefaultPolicy<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stateless(_) => f.write_str("DefaultPolicy::Stateless"),
            Self::Stateful { .. } => f.write_str("DefaultPolicy::Stateful"),
        }
    }
}

/// A deterministic scorer: context in, one nonnegative score per action out.
///
/// The explorers validate length, NaNs, and signs; violations surface as
/// [`ExploreError::BadScorerOutput`](crate::ExploreError::BadScorerOutput).
pub enum DefaultScorer<C, S = ()> {
    /// A plain function of the context.
    Stateless(fn(&C) -> Vec<f32>),
    /// A function of caller state plus context.
    Stateful {
        func: fn(&S, &C) -> Vec<f32>,
        state: S,
    },
}

impl<C> DefaultScorer<C> {
    /// Wrap a stateless scorer function.
    ///
    /// Pins the state parameter to `()`, mirroring [`DefaultPolicy::stateless`].
    #[must_use]
    pub fn stateless(func: fn(&C) -> Vec<f32>) -> Self {
        Self::Stateless(func)
    }
}

impl<C, S> DefaultScorer<C, S> {
    /// Wrap a stateful scorer function with its state.
    #[must_use]
    pub fn stateful(func: fn(&S, &C) -> Vec<f32>, state: S) -> Self {
        Self::Stateful { func, state }
    }

    /// Invoke the wrapped callback.
    pub fn invoke(&self, context: &C) -> Vec<f32> {
        match self {
            Self::Stateless(func) => func(context),
            Self::Stateful { func, state } => func(state, context),
        }
    }
}

impl<C, S: Clone> Clone for DefaultScorer<C, S> {
    fn clone(&self) -> Self {
        match self {
            Self::Stateless(func) => Self::Stateless(*func),
            Self::Stateful { func, state } => Self::Stateful {
                func: *func,
                state: state.clone(),
            },
        }
    }
}

impl<C, S> fmt::Debug for DefaultScorer<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stateless(_) => f.write_str("DefaultScorer::Stateless"),
            Self::Stateful { .. } => f.write_str("DefaultScorer::Stateful"),
        }
    }
}
