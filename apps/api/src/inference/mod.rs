//! Hosted inference client — the single point of entry for model calls.
//!
//! Talks to a Hugging Face style inference API (`POST {base}/models/{model}`).
//! One client serves both collaborators the analysis engine needs: the sentiment
//! classifier and the paraphrase generator.
//!
//! Calls are made once. There is no retry loop and no client-side timeout; a failed
//! call fails the request that issued it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::rewrites::{RewriteGenerator, SamplingParams};
use crate::analysis::sentiment::{Classification, SentimentClassifier};
use crate::config::Config;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned no output")]
    EmptyOutput,

    #[error("Malformed model output: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a, P: Serialize> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<P>,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    num_return_sequences: u32,
    do_sample: bool,
    top_p: f64,
    top_k: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Text classification responses come back either flat or wrapped in a per-input list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationPayload {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationPayload {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassificationPayload::Nested(batches) => {
                batches.into_iter().next().unwrap_or_default()
            }
            ClassificationPayload::Flat(scores) => scores,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Client for the hosted classifier and paraphrase models.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    sentiment_model: String,
    paraphrase_model: String,
}

impl InferenceClient {
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        sentiment_model: String,
        paraphrase_model: String,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_token,
            sentiment_model,
            paraphrase_model,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.inference_api_url.clone(),
            config.inference_api_token.clone(),
            config.sentiment_model.clone(),
            config.paraphrase_model.clone(),
        )
    }

    pub fn sentiment_model(&self) -> &str {
        &self.sentiment_model
    }

    pub fn paraphrase_model(&self) -> &str {
        &self.paraphrase_model
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), model)
    }

    /// Posts a single inference request and deserializes the JSON body.
    async fn infer<P: Serialize, T: DeserializeOwned>(
        &self,
        model: &str,
        inputs: &str,
        parameters: Option<P>,
    ) -> Result<T, InferenceError> {
        let request_body = InferenceRequest {
            inputs,
            parameters,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.model_url(model)).json(&request_body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        debug!("Inference call to {model} succeeded ({} bytes)", body.len());
        serde_json::from_str(&body).map_err(InferenceError::Parse)
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClient {
    async fn classify(&self, text: &str) -> Result<Classification, InferenceError> {
        let payload: ClassificationPayload = self
            .infer::<(), _>(&self.sentiment_model, text, None)
            .await?;
        dominant_label(payload.into_scores())
    }
}

#[async_trait]
impl RewriteGenerator for InferenceClient {
    async fn generate(
        &self,
        prompt: &str,
        num_sequences: u32,
        sampling: &SamplingParams,
    ) -> Result<Vec<String>, InferenceError> {
        let parameters = GenerationParameters {
            num_return_sequences: num_sequences,
            do_sample: true,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
        };
        let outputs: Vec<GeneratedText> = self
            .infer(&self.paraphrase_model, prompt, Some(parameters))
            .await?;
        Ok(outputs.into_iter().map(|o| o.generated_text).collect())
    }
}

/// Picks the highest-scoring label. The classifier contract is a single top label.
fn dominant_label(scores: Vec<LabelScore>) -> Result<Classification, InferenceError> {
    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|top| Classification {
            label: top.label,
            score: top.score,
        })
        .ok_or(InferenceError::EmptyOutput)
}
