//! Rewrite generation — asks the paraphrase model for candidates and reduces them to
//! a unique, order-preserving list.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::inference::InferenceError;

pub const DEFAULT_REWRITE_VARIANTS: u32 = 3;
pub const MAX_REWRITE_VARIANTS: u32 = 5;

const PARAPHRASE_PROMPT_PREFIX: &str = "paraphrase: ";

/// Nucleus / top-k sampling settings passed through to the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            top_p: 0.92,
            top_k: 50,
        }
    }
}

/// The external paraphrase model. May return fewer strings than requested, and may
/// repeat itself verbatim.
#[async_trait]
pub trait RewriteGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        num_sequences: u32,
        sampling: &SamplingParams,
    ) -> Result<Vec<String>, InferenceError>;
}

/// Trims a candidate and folds it onto a single line.
fn normalize_candidate(candidate: &str) -> String {
    candidate.trim().replace('\n', " ")
}

/// Reduces candidates to their first case-insensitive occurrence.
///
/// Output keeps the normalized form (trimmed, newlines replaced by spaces) and the
/// casing of the first occurrence. Output order is a subsequence of input order,
/// and deduping an already deduped list returns it unchanged.
pub fn dedupe_rewrites<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for candidate in candidates {
        let normalized = normalize_candidate(candidate.as_ref());
        if seen.insert(normalized.to_lowercase()) {
            unique.push(normalized);
        }
    }

    unique
}

/// Requests `num_variants` paraphrases of `text` and dedupes them.
/// Callers must not assume the result has `num_variants` entries.
pub async fn generate_rewrites(
    generator: &dyn RewriteGenerator,
    text: &str,
    num_variants: u32,
) -> Result<Vec<String>, InferenceError> {
    let prompt = format!("{PARAPHRASE_PROMPT_PREFIX}{text}");
    let candidates = generator
        .generate(&prompt, num_variants, &SamplingParams::default())
        .await?;
    let unique = dedupe_rewrites(&candidates);
    debug!(
        "Rewrite candidates: requested={}, received={}, unique={}",
        num_variants,
        candidates.len(),
        unique.len()
    );
    Ok(unique)
}
