//! Caller contexts and the snapshot the log keeps of them.
//!
//! The explorer never inspects a context; it hands it to the caller's policy or scorer
//! and, when a draw is logged, copies a [`ContextSnapshot`] into the interaction record
//! so offline evaluation can replay candidate policies against exactly what the logging
//! policy saw.

/// A single sparse feature: index plus value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    pub index: u32,
    pub value: f32,
}

/// The logged copy of a decision context: sparse features plus an optional free-form
/// string. Either part may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextSnapshot {
    pub features: Vec<Feature>,
    pub other_context: Option<String>,
}

/// Implemented by caller context types so the library can snapshot them for logging.
pub trait ExploreContext {
    /// Produce the copy that will be stored in the interaction record.
    fn snapshot(&self) -> ContextSnapshot;
}

impl ExploreContext for ContextSnapshot {
    fn snapshot(&self) -> ContextSnapshot {
        self.clone()
    }
}

/// A ready-made context carrying sparse features and an optional auxiliary string.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleContext {
    features: Vec<Feature>,
    other_context: Option<String>,
}

impl SimpleContext {
    /// A context holding only sparse features.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            other_context: None,
        }
    }

    /// Attach an auxiliary context string.
    #[must_use]
    pub fn with_other_context(mut self, other: impl Into<String>) -> Self {
        self.other_context = Some(other.into());
        self
    }

    /// The sparse features of this context.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl ExploreContext for SimpleContext {
    fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            features: self.features.clone(),
            other_context: self.other_context.clone(),
        }
    }
}
