// Content analysis: entity extraction, sentiment normalization, rewrite dedup,
// posting-time advice and the suggestion rules, plus the pipeline and HTTP layer
// that tie them together. Model calls go through the collaborator traits only.

pub mod engine;
pub mod entities;
pub mod handlers;
pub mod pdf;
pub mod rewrites;
pub mod schedule;
pub mod sentiment;
pub mod store;
pub mod suggestions;
