//! Sentiment normalization — turns a classifier's (label, confidence) pair into a
//! signed compound score the suggestion rules can compare.
//!
//! Sign rule: `compound = +score` for `Positive`, `-score` for every other label.
//! `Neutral` therefore carries the same sign as `Negative`. The tone rule in
//! `suggestions` reads `compound`, so this asymmetry is kept as is.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::inference::InferenceError;

/// Only this many characters of the input ever reach the classifier.
pub const MAX_CLASSIFIER_CHARS: usize = 512;

/// Raw classifier output, before label normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// The external sentiment model. Implement this to swap backends; the engine holds
/// an `Arc<dyn SentimentClassifier>` injected at startup.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Returns the single dominant label and its confidence in [0, 1].
    async fn classify(&self, text: &str) -> Result<Classification, InferenceError>;
}

/// Classifier label, normalized once at ingestion. Labels outside the three common
/// ones are kept lower-cased in `Other` and signed like `Negative`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl From<String> for SentimentLabel {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            "neutral" => SentimentLabel::Neutral,
            other => SentimentLabel::Other(other.to_string()),
        }
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.to_string()
    }
}

impl FromStr for SentimentLabel {
    type Err = InferenceError;

    /// Fails only on a blank label; every non-empty label is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(InferenceError::Malformed(
                "classifier returned an empty label".to_string(),
            ));
        }
        Ok(SentimentLabel::from(s.to_string()))
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Other(label) => label.as_str(),
        };
        f.write_str(s)
    }
}

/// Normalized sentiment. Invariant: `compound.abs() == score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    pub compound: f64,
}

impl SentimentResult {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        let compound = match label {
            SentimentLabel::Positive => score,
            SentimentLabel::Negative | SentimentLabel::Neutral | SentimentLabel::Other(_) => {
                -score
            }
        };
        Self {
            label,
            score,
            compound,
        }
    }
}

/// Validates a raw classification and derives the compound score.
pub fn normalize(raw: Classification) -> Result<SentimentResult, InferenceError> {
    let label: SentimentLabel = raw.label.parse()?;
    if !raw.score.is_finite() || !(0.0..=1.0).contains(&raw.score) {
        return Err(InferenceError::Malformed(format!(
            "sentiment score {} outside [0, 1]",
            raw.score
        )));
    }
    Ok(SentimentResult::new(label, raw.score))
}

/// Returns the first `MAX_CLASSIFIER_CHARS` characters of `text`.
pub fn classifier_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_CLASSIFIER_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Classifies the truncated text and normalizes the result.
pub async fn analyze_sentiment(
    classifier: &dyn SentimentClassifier,
    text: &str,
) -> Result<SentimentResult, InferenceError> {
    let raw = classifier.classify(classifier_input(text)).await?;
    normalize(raw)
}
