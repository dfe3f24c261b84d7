use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use super::{EntityMention, LabelScore, SequenceClassifier, TokenClassifier};

/// One pretrained model behind a hosted inference API (Hugging Face style).
///
/// A `RemoteModel` is constructed per model id and implements both
/// classification traits; which one is used depends on the task the model
/// was trained for. The server side owns tokenization, padding, truncation
/// and the forward pass.
pub struct RemoteModel {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl RemoteModel {
    pub fn new(api_url: impl AsRef<str>, model_id: impl AsRef<str>, api_key: Option<String>) -> Self {
        Self {
            endpoint: format!(
                "{}/models/{}",
                api_url.as_ref().trim_end_matches('/'),
                model_id.as_ref()
            ),
            api_key,
            timeout: Duration::from_secs(30),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one inference request and return the raw response body.
    /// A single call is never retried; transient failures propagate.
    ///
    /// The timeout spans the whole exchange, body read included; a server
    /// that answers with prompt headers but a stalled body still times out.
    async fn post(&self, body: &InferenceRequest<'_>) -> Result<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let exchange = async {
            let response = request.send().await.context("Inference HTTP request failed")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Inference API error {}: {}", status, body);
            }

            response
                .text()
                .await
                .context("Failed to read inference response body")
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .context("Inference request timed out")?
    }
}

#[async_trait::async_trait]
impl SequenceClassifier for RemoteModel {
    async fn classify(&self, text: &str) -> Result<LabelScore> {
        let body = InferenceRequest {
            inputs: text,
            parameters: Some(Parameters {
                // Pad to the batch max, truncate to the model max input length.
                padding: Some(true),
                truncation: Some(true),
                aggregation_strategy: None,
            }),
            options: Options { wait_for_model: true },
        };

        let body_text = self.post(&body).await?;

        // The API nests classification output per batch entry; some
        // deployments return the flat form for a single input. Accept both.
        let scores: Vec<LabelScore> =
            match serde_json::from_str::<Vec<Vec<LabelScore>>>(&body_text) {
                Ok(mut nested) => {
                    if nested.is_empty() {
                        anyhow::bail!("Classification response has no batch entries: {}", body_text);
                    }
                    nested.remove(0)
                }
                Err(_) => serde_json::from_str::<Vec<LabelScore>>(&body_text).with_context(|| {
                    format!("Failed to parse classification response: {}", body_text)
                })?,
            };

        // Scores come back sorted by descending confidence; the contract is
        // exactly one top pair per call.
        scores
            .into_iter()
            .next()
            .context("Classification response has no labels")
    }

    async fn ready(&self) -> Result<()> {
        let probe = InferenceRequest {
            inputs: "ping",
            parameters: None,
            options: Options { wait_for_model: true },
        };
        self.post(&probe)
            .await
            .with_context(|| format!("Model not ready at {}", self.endpoint))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenClassifier for RemoteModel {
    async fn recognize(&self, text: &str) -> Result<Vec<EntityMention>> {
        let body = InferenceRequest {
            inputs: text,
            parameters: Some(Parameters {
                padding: None,
                truncation: None,
                // Merge sub-word pieces into whole-word/phrase spans.
                aggregation_strategy: Some("simple"),
            }),
            options: Options { wait_for_model: true },
        };

        let body_text = self.post(&body).await?;

        let mentions: Vec<EntityMention> = serde_json::from_str(&body_text)
            .with_context(|| format!("Failed to parse NER response: {}", body_text))?;
        Ok(mentions)
    }

    async fn ready(&self) -> Result<()> {
        SequenceClassifier::ready(self).await
    }
}

// Inference API request structures
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Parameters>,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Parameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    padding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aggregation_strategy: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Options {
    wait_for_model: bool,
}
