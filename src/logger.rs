//! The append-only interaction log.
//!
//! One logger belongs to one explorer and is only written from `choose_action`, so there
//! is no locking. Ids are assigned per logger, starting at 1, strictly in append order;
//! there is no compaction, eviction, or truncation. Parallel deployments run one
//! explorer (and logger) per worker and merge exported streams afterwards.

use std::io;

use crate::error::ExploreError;
use crate::interaction::Interaction;

/// Append-only, per-application ordered sequence of interactions.
#[derive(Debug, Clone)]
pub struct InteractionLogger {
    app_id: String,
    interactions: Vec<Interaction>,
    next_id: u64,
}

impl InteractionLogger {
    /// Create an empty log tagged with `app_id`.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            interactions: Vec::new(),
            next_id: 1,
        }
    }

    /// The application tag this log belongs to.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Append an interaction, assigning the next log id. Returns the assigned id.
    pub fn store(&mut self, mut interaction: Interaction) -> u64 {
        let id = self.next_id;
        interaction.assign_id(id);
        self.next_id += 1;
        tracing::trace!(
            app_id = %self.app_id,
            id,
            action = interaction.action(),
            probability = f64::from(interaction.probability()),
            "appended interaction"
        );
        self.interactions.push(interaction);
        id
    }

    /// The id the next stored interaction will receive.
    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of logged interactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// All logged interactions, in append order.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// The full log in binary form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for interaction in &self.interactions {
            interaction.write_binary(&mut buf);
        }
        buf
    }

    /// Write the full binary log to a caller-owned stream.
    pub fn serialize_all<W: io::Write>(&self, stream: &mut W) -> io::Result<()> {
        stream.write_all(&self.to_bytes())
    }

    /// The full log in text form, one record per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for interaction in &self.interactions {
            interaction.write_text(&mut out);
            out.push('\n');
        }
        out
    }
}

/// Load a flat interaction set from a binary stream produced by
/// [`InteractionLogger::serialize_all`].
pub fn load_interactions(mut bytes: &[u8]) -> Result<Vec<Interaction>, ExploreError> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        out.push(Interaction::read_binary(&mut bytes)?);
    }
    tracing::debug!(count = out.len(), "loaded binary interaction stream");
    Ok(out)
}

/// Load a flat interaction set from the text form. Blank lines are skipped.
pub fn load_interactions_text(text: &str) -> Result<Vec<Interaction>, ExploreError> {
    let mut out = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        out.push(Interaction::parse_text(line)?);
    }
    tracing::debug!(count = out.len(), "loaded text interaction stream");
    Ok(out)
}
