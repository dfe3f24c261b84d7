//! News analyzer: runs the three classification pipelines and the NER
//! model over one submission and assembles the combined result.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::inference::remote::RemoteModel;
use crate::inference::{EntityMention, SequenceClassifier, TokenClassifier};
use crate::labels::{Category, ClickbaitVerdict, FakeVerdict};
use crate::pipeline::{Classification, NewsPipeline};

const DEFAULT_SEP_TOKEN: &str = "[SEP]";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Entity mentions per input field. `content` is `None` when no content was
/// submitted; a content that produced no mentions is `Some(vec![])`. The
/// two states are deliberately distinct.
#[derive(Debug, Clone)]
pub struct NerAnalysis {
    pub headline: Vec<EntityMention>,
    pub content: Option<Vec<EntityMention>>,
}

/// The per-submission aggregate. Immutable once built; consumed by the
/// presentation layer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub category: Classification<Category>,
    pub fake: Classification<FakeVerdict>,
    pub clickbait: Classification<ClickbaitVerdict>,
    pub ner: NerAnalysis,
}

/// Holds the four independently configured sub-pipelines for the process
/// lifetime. Stateless across calls; safe to share behind `Arc`.
pub struct NewsAnalyzer {
    category_pipe: NewsPipeline<Category>,
    fake_pipe: NewsPipeline<FakeVerdict>,
    clickbait_pipe: NewsPipeline<ClickbaitVerdict>,
    ner: Arc<dyn TokenClassifier>,
}

impl NewsAnalyzer {
    /// Assemble an analyzer from already-constructed backends. No readiness
    /// probing happens here; use [`NewsAnalyzer::connect`] for the eager
    /// startup path.
    pub fn new(
        category: (Arc<dyn SequenceClassifier>, String),
        fake: (Arc<dyn SequenceClassifier>, String),
        clickbait: (Arc<dyn SequenceClassifier>, String),
        ner: Arc<dyn TokenClassifier>,
    ) -> Self {
        Self {
            category_pipe: NewsPipeline::new(category.0, category.1),
            fake_pipe: NewsPipeline::new(fake.0, fake.1),
            clickbait_pipe: NewsPipeline::new(clickbait.0, clickbait.1),
            ner,
        }
    }

    /// Build the four remote models from configuration and probe each one.
    ///
    /// Probing is eager: a missing or unreachable model fails analyzer
    /// construction. There is no degraded mode with fewer sub-pipelines.
    pub async fn connect(config: &common::Config, api_key: Option<String>) -> Result<Self> {
        let api_url = config
            .inference
            .api_url
            .as_deref()
            .context("inference.api_url is not configured")?;
        let timeout = config
            .inference
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

        let build = |model: &common::ModelConfig| -> (Arc<RemoteModel>, String) {
            let remote =
                RemoteModel::new(api_url, &model.id, api_key.clone()).with_timeout(timeout);
            let sep = model
                .sep_token
                .clone()
                .unwrap_or_else(|| DEFAULT_SEP_TOKEN.to_string());
            (Arc::new(remote), sep)
        };

        let (category, category_sep) = build(&config.models.category);
        let (fake, fake_sep) = build(&config.models.fake);
        let (clickbait, clickbait_sep) = build(&config.models.clickbait);
        let (ner, _) = build(&config.models.ner);

        for (slot, model) in [
            ("category", &category),
            ("fake", &fake),
            ("clickbait", &clickbait),
            ("ner", &ner),
        ] {
            SequenceClassifier::ready(model.as_ref())
                .await
                .with_context(|| format!("{} model failed readiness probe", slot))?;
            tracing::info!(model = %model.endpoint(), "{} model ready", slot);
        }

        Ok(Self::new(
            (category, category_sep),
            (fake, fake_sep),
            (clickbait, clickbait_sep),
            ner,
        ))
    }

    /// Run all four sub-pipelines over one submission.
    ///
    /// Category and fake classification see headline plus content; clickbait
    /// framing is a headline-only property, so its pipeline never sees the
    /// content. Any sub-failure fails the whole analysis.
    pub async fn analyze(&self, headline: &str, content: Option<&str>) -> Result<Analysis> {
        let category = self
            .category_pipe
            .analyze(headline, content)
            .await
            .context("category classification failed")?;
        let fake = self
            .fake_pipe
            .analyze(headline, content)
            .await
            .context("fake-news classification failed")?;
        let clickbait = self
            .clickbait_pipe
            .analyze(headline, None)
            .await
            .context("clickbait classification failed")?;

        let headline_ner = self
            .ner
            .recognize(headline)
            .await
            .context("headline entity recognition failed")?;
        let content_ner = match content {
            Some(content) if !content.is_empty() => Some(
                self.ner
                    .recognize(content)
                    .await
                    .context("content entity recognition failed")?,
            ),
            _ => None,
        };

        Ok(Analysis {
            category,
            fake,
            clickbait,
            ner: NerAnalysis { headline: headline_ner, content: content_ner },
        })
    }
}
