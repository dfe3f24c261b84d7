use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Core trait for sequence classification backends (hosted or local).
///
/// Implementations own tokenization, padding, truncation and the forward
/// pass; callers only see the single top-scoring label/score pair.
#[async_trait::async_trait]
pub trait SequenceClassifier: Send + Sync {
    /// Score one input text and return the best label.
    async fn classify(&self, text: &str) -> Result<LabelScore>;

    /// Probe that the underlying model is loaded and reachable.
    async fn ready(&self) -> Result<()>;
}

/// Core trait for token classification (named-entity recognition) backends.
#[async_trait::async_trait]
pub trait TokenClassifier: Send + Sync {
    /// Recognize entity mentions in one input text.
    ///
    /// Mentions are whole-word/phrase spans ("simple" aggregation of
    /// sub-word predictions), non-overlapping and sorted by ascending
    /// start offset.
    async fn recognize(&self, text: &str) -> Result<Vec<EntityMention>>;

    /// Probe that the underlying model is loaded and reachable.
    async fn ready(&self) -> Result<()>;
}

/// The single top-scoring class for one classification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    /// Model confidence in [0, 1].
    pub score: f32,
}

/// One recognized entity span.
///
/// `start`/`end` are character offsets into the original input string,
/// end-exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub word: String,
    pub entity_group: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
}

pub mod remote;
