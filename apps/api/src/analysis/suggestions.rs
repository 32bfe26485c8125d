//! Suggestion rules — a fixed, ordered set of independent heuristics.
//!
//! Rules run top to bottom and each appends at most one message. No rule suppresses
//! another, so the output order is always the rule order below:
//! 1. negative compound sentiment
//! 2. word count (too short / too long, never both)
//! 3. fewer than two hashtags
//! 4. no call-to-action phrase
//! 5. missing engagement keywords (first four named)

use crate::analysis::entities::EntitySet;
use crate::analysis::sentiment::SentimentResult;

pub const MIN_WORDS: usize = 8;
pub const MAX_WORDS: usize = 40;
pub const MIN_HASHTAGS: usize = 2;
const MAX_NAMED_KEYWORDS: usize = 4;

const CALL_TO_ACTION_PHRASES: &[&str] = &[
    "link in bio",
    "read more",
    "check out",
    "learn more",
    "join",
    "register",
];

const ENGAGEMENT_KEYWORDS: &[&str] = &["amazing", "exciting", "exclusive", "limited", "join"];

pub const NEGATIVE_TONE: &str = "Tone feels negative; consider a more upbeat phrasing.";
pub const TOO_SHORT: &str = "Caption is very short; add context or a call-to-action.";
pub const TOO_LONG: &str = "Caption is long; tighten to improve skim-readability.";
pub const FEW_HASHTAGS: &str = "Add 2–3 specific hashtags; avoid overly generic ones.";
pub const MISSING_CALL_TO_ACTION: &str =
    "Include a clear call-to-action (e.g., ‘Learn more’, ‘Join us today’).";

/// Evaluates every rule against the caption and returns the triggered messages in
/// rule order. Pure and deterministic.
pub fn improvement_suggestions(
    text: &str,
    sentiment: &SentimentResult,
    entities: &EntitySet,
) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut suggestions = Vec::new();

    if sentiment.compound < 0.0 {
        suggestions.push(NEGATIVE_TONE.to_string());
    }

    if let Some(message) = length_suggestion(word_count(text)) {
        suggestions.push(message.to_string());
    }

    if entities.hashtags.len() < MIN_HASHTAGS {
        suggestions.push(FEW_HASHTAGS.to_string());
    }

    if !CALL_TO_ACTION_PHRASES
        .iter()
        .any(|phrase| text_lower.contains(phrase))
    {
        suggestions.push(MISSING_CALL_TO_ACTION.to_string());
    }

    let missing = missing_keywords(&text_lower);
    if !missing.is_empty() {
        suggestions.push(format!(
            "Consider using engaging keywords like: {}.",
            missing
                .iter()
                .take(MAX_NAMED_KEYWORDS)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    suggestions
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// At most one of the two length messages can apply.
fn length_suggestion(words: usize) -> Option<&'static str> {
    if words < MIN_WORDS {
        Some(TOO_SHORT)
    } else if words > MAX_WORDS {
        Some(TOO_LONG)
    } else {
        None
    }
}

/// Engagement keywords absent from the (already lower-cased) text, in list order.
fn missing_keywords(text_lower: &str) -> Vec<&'static str> {
    ENGAGEMENT_KEYWORDS
        .iter()
        .filter(|&&kw| !text_lower.contains(kw))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::entities::extract_entities;
    use crate::analysis::sentiment::SentimentLabel;

    fn positive(score: f64) -> SentimentResult {
        SentimentResult::new(SentimentLabel::Positive, score)
    }

    #[test]
    fn test_promo_caption_of_eight_words_is_not_short() {
        let text = "Check out our #sale #deal @brand https://x.co now!";
        let entities = extract_entities(text);
        let sentiment = positive(0.9);

        let suggestions = improvement_suggestions(text, &sentiment, &entities);

        assert_eq!(word_count(text), 8);
        assert_eq!(
            suggestions,
            vec![
                "Consider using engaging keywords like: amazing, exciting, exclusive, limited."
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_seven_word_caption_is_too_short() {
        let text = "Check out our #sale #deal today friends";
        let entities = extract_entities(text);

        let suggestions = improvement_suggestions(text, &positive(0.9), &entities);

        assert_eq!(word_count(text), 7);
        assert_eq!(suggestions[0], TOO_SHORT);
        assert!(!suggestions.contains(&FEW_HASHTAGS.to_string()));
        assert!(!suggestions.contains(&MISSING_CALL_TO_ACTION.to_string()));
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_long_negative_caption_triggers_every_rule_in_order() {
        let text = vec!["terrible"; 45].join(" ");
        let entities = extract_entities(&text);
        let sentiment = SentimentResult::new(SentimentLabel::Negative, 0.7);
        assert!((sentiment.compound + 0.7).abs() < f64::EPSILON);

        let suggestions = improvement_suggestions(&text, &sentiment, &entities);

        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0], NEGATIVE_TONE);
        assert_eq!(suggestions[1], TOO_LONG);
        assert_eq!(suggestions[2], FEW_HASHTAGS);
        assert_eq!(suggestions[3], MISSING_CALL_TO_ACTION);
        assert!(suggestions[4].starts_with("Consider using engaging keywords like: "));
    }

    #[test]
    fn test_neutral_sentiment_triggers_tone_warning() {
        let sentiment = SentimentResult::new(SentimentLabel::Neutral, 0.6);
        let text = "Join our amazing exciting exclusive limited launch event this weekend #a #b";
        let suggestions = improvement_suggestions(text, &sentiment, &extract_entities(text));
        assert_eq!(suggestions, vec![NEGATIVE_TONE.to_string()]);
    }

    #[test]
    fn test_length_branches_are_exclusive() {
        for words in 0..60 {
            let short = words < MIN_WORDS;
            let long = words > MAX_WORDS;
            assert!(!(short && long));
            match length_suggestion(words) {
                Some(TOO_SHORT) => assert!(short),
                Some(TOO_LONG) => assert!(long),
                Some(other) => panic!("unexpected message {other}"),
                None => assert!(!short && !long),
            }
        }
    }

    #[test]
    fn test_word_count_boundaries() {
        assert_eq!(length_suggestion(8), None);
        assert_eq!(length_suggestion(40), None);
        assert_eq!(length_suggestion(7), Some(TOO_SHORT));
        assert_eq!(length_suggestion(41), Some(TOO_LONG));
        assert_eq!(word_count("  spaced \t out\nwords  "), 3);
    }

    #[test]
    fn test_call_to_action_is_case_insensitive_substring() {
        let text = "Tap the LINK IN BIO for details on our #spring #drop collection today friends";
        let suggestions = improvement_suggestions(text, &positive(0.8), &extract_entities(text));
        assert!(!suggestions.contains(&MISSING_CALL_TO_ACTION.to_string()));
    }

    #[test]
    fn test_keyword_suggestion_names_at_most_four() {
        let missing = missing_keywords("nothing relevant");
        assert_eq!(missing.len(), 5);
        let text = "nothing relevant";
        let suggestions = improvement_suggestions(text, &positive(0.5), &EntitySet::default());
        let last = suggestions.last().unwrap();
        assert!(!last.contains("join"));
        assert!(last.contains("limited"));
    }

    #[test]
    fn test_keyword_rule_silent_when_all_present() {
        let text = "amazing exciting exclusive limited join";
        assert!(missing_keywords(text).is_empty());
    }

    #[test]
    fn test_keywords_match_inside_words() {
        // "joined" contains "join", "unlimited" contains "limited"
        let missing = missing_keywords("we joined an unlimited plan");
        assert_eq!(missing, vec!["amazing", "exciting", "exclusive"]);
    }

    #[test]
    fn test_output_is_deterministic() {
        let text = "Exclusive drop is here, register today #new";
        let entities = extract_entities(text);
        let sentiment = positive(0.4);
        let a = improvement_suggestions(text, &sentiment, &entities);
        let b = improvement_suggestions(text, &sentiment, &entities);
        assert_eq!(a, b);
    }
}
