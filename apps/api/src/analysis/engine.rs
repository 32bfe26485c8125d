//! Analysis pipeline — composes entity extraction, sentiment, scheduling, suggestions
//! and rewrites into one report.
//!
//! Flow: validate input → schedule advice → extract entities →
//!       classify sentiment → generate rewrites → suggestion rules → Report.
//!
//! The model calls run one after the other; a classifier failure stops the request
//! before the generator is called.
//!
//! The analyzer holds no per-request state. Every call builds its own entities,
//! sentiment and suggestion list, so concurrent requests never share intermediates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::entities::{extract_entities, EntitySet};
use crate::analysis::rewrites::{
    generate_rewrites, RewriteGenerator, DEFAULT_REWRITE_VARIANTS, MAX_REWRITE_VARIANTS,
};
use crate::analysis::schedule::{advise, ScheduleAdvice};
use crate::analysis::sentiment::{analyze_sentiment, SentimentClassifier, SentimentResult};
use crate::analysis::suggestions::improvement_suggestions;
use crate::errors::AppError;

/// The full per-request analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub sentiment: SentimentResult,
    pub entities: EntitySet,
    pub best_times: ScheduleAdvice,
    pub suggestions: Vec<String>,
    pub rewrites: Vec<String>,
}

/// Per-request knobs. `None` means "use the analyzer default".
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub rewrite_variants: Option<u32>,
    pub timezone: Option<String>,
}

/// Holds the injected model collaborators for the lifetime of the process.
#[derive(Clone)]
pub struct Analyzer {
    classifier: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn RewriteGenerator>,
    default_timezone: String,
}

impl Analyzer {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        generator: Arc<dyn RewriteGenerator>,
        default_timezone: String,
    ) -> Self {
        Self {
            classifier,
            generator,
            default_timezone,
        }
    }

    /// Analyzes `text` with the default timezone and three rewrite variants.
    pub async fn analyze_text(&self, text: &str) -> Result<Report, AppError> {
        self.analyze(text, &AnalyzeOptions::default()).await
    }

    /// Runs the whole pipeline. Either every stage succeeds and a full report is
    /// returned, or the first failure is returned and nothing else.
    pub async fn analyze(&self, text: &str, options: &AnalyzeOptions) -> Result<Report, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "No text provided (either PDF or text content).".to_string(),
            ));
        }

        let variants = options.rewrite_variants.unwrap_or(DEFAULT_REWRITE_VARIANTS);
        if !(1..=MAX_REWRITE_VARIANTS).contains(&variants) {
            return Err(AppError::Validation(format!(
                "rewrite_variants must be between 1 and {MAX_REWRITE_VARIANTS}"
            )));
        }

        let timezone = options
            .timezone
            .as_deref()
            .unwrap_or(&self.default_timezone);
        let best_times = advise(timezone)?;

        let entities = extract_entities(text);
        info!(
            "Extracted entities: hashtags={}, mentions={}, urls={}",
            entities.hashtags.len(),
            entities.mentions.len(),
            entities.urls.len()
        );

        let sentiment = analyze_sentiment(self.classifier.as_ref(), text)
            .await
            .map_err(|e| AppError::Classifier(e.to_string()))?;

        let rewrites = generate_rewrites(self.generator.as_ref(), text, variants)
            .await
            .map_err(|e| AppError::Generator(e.to_string()))?;
        info!(
            "Sentiment: label={}, compound={:.3}; rewrites={}",
            sentiment.label,
            sentiment.compound,
            rewrites.len()
        );

        let suggestions = improvement_suggestions(text, &sentiment, &entities);

        Ok(Report {
            sentiment,
            entities,
            best_times,
            suggestions,
            rewrites,
        })
    }
}
