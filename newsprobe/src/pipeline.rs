//! Classification pipeline: one pretrained sequence-classification model
//! plus the task's closed label set.

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;

use crate::inference::SequenceClassifier;
use crate::labels::TaskLabel;

/// Result of one classification call. Built fresh per call, never cached
/// at this layer.
#[derive(Debug, Clone, Copy)]
pub struct Classification<L: TaskLabel> {
    pub label: L,
    /// Model confidence for `label`, in [0, 1].
    pub score: f32,
}

impl<L: TaskLabel> Classification<L> {
    /// Display glyph, derived deterministically from the label.
    pub fn emoji(&self) -> &'static str {
        self.label.emoji()
    }
}

/// Wraps one classifier with the task's label set and the model's reserved
/// separator token.
pub struct NewsPipeline<L: TaskLabel> {
    classifier: Arc<dyn SequenceClassifier>,
    sep_token: String,
    _label: PhantomData<L>,
}

impl<L: TaskLabel> NewsPipeline<L> {
    pub fn new(classifier: Arc<dyn SequenceClassifier>, sep_token: impl Into<String>) -> Self {
        Self {
            classifier,
            sep_token: sep_token.into(),
            _label: PhantomData,
        }
    }

    /// Classify a headline with optional article content.
    ///
    /// Non-empty content is joined to the headline with the separator token
    /// surrounded by single spaces; otherwise the headline goes in alone.
    /// A label outside the task's set aborts with `UnknownLabel` (the model
    /// and the label set disagree, which is a configuration defect).
    pub async fn analyze(&self, headline: &str, content: Option<&str>) -> Result<Classification<L>> {
        let text = match content {
            Some(content) if !content.is_empty() => {
                format!("{} {} {}", headline, self.sep_token, content)
            }
            _ => headline.to_string(),
        };

        let top = self.classifier.classify(&text).await?;
        let label = L::from_model_label(&top.label)?;
        Ok(Classification { label, score: top.score })
    }

    pub async fn ready(&self) -> Result<()> {
        self.classifier.ready().await
    }
}
