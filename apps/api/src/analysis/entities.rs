//! Entity extraction — hashtags, mentions and links pulled out of raw caption text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_]+)").unwrap());
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\p{L}\p{N}_]+)").unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Entities found in a piece of text, each list in order of first appearance.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub urls: Vec<String>,
}

/// Extracts hashtags, mentions and URLs from `text`.
///
/// Tag and mention bodies are letters, digits and `_`. Combining marks end a tag,
/// so a decomposed `cafe\u{301}` yields `cafe`.
///
/// The three scans are independent. A URL fragment such as `https://x.co/#top`
/// also yields the hashtag `top`.
pub fn extract_entities(text: &str) -> EntitySet {
    EntitySet {
        hashtags: captures(&HASHTAG_RE, text),
        mentions: captures(&MENTION_RE, text),
        urls: URL_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

fn captures(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_with_all_entity_kinds() {
        let entities = extract_entities("Check out our #sale #deal @brand https://x.co now!");
        assert_eq!(entities.hashtags, vec!["sale", "deal"]);
        assert_eq!(entities.mentions, vec!["brand"]);
        assert_eq!(entities.urls, vec!["https://x.co"]);
    }

    #[test]
    fn test_duplicates_are_preserved_in_order() {
        let entities = extract_entities("#a @x #b #a @x");
        assert_eq!(entities.hashtags, vec!["a", "b", "a"]);
        assert_eq!(entities.mentions, vec!["x", "x"]);
    }

    #[test]
    fn test_hashtags_never_contain_hash() {
        let entities = extract_entities("##double #tag#joined #under_score #42 # lonely");
        assert_eq!(entities.hashtags, vec!["double", "tag", "joined", "under_score", "42"]);
        for tag in &entities.hashtags {
            assert!(!tag.contains('#'));
            assert!(tag.chars().all(|c| c.is_alphanumeric() || c == '_'));
        }
    }

    #[test]
    fn test_url_fragment_also_yields_hashtag() {
        let entities = extract_entities("see https://example.com/page#section");
        assert_eq!(entities.urls, vec!["https://example.com/page#section"]);
        assert_eq!(entities.hashtags, vec!["section"]);
    }

    #[test]
    fn test_url_runs_to_whitespace() {
        let entities = extract_entities("a http://a.b/c?d=1, then https://z.io");
        assert_eq!(entities.urls, vec!["http://a.b/c?d=1,", "https://z.io"]);
    }

    #[test]
    fn test_unicode_word_characters() {
        let entities = extract_entities("#café @zoë");
        assert_eq!(entities.hashtags, vec!["café"]);
        assert_eq!(entities.mentions, vec!["zoë"]);
    }

    #[test]
    fn test_combining_mark_ends_tag() {
        let entities = extract_entities("#cafe\u{301} @zoe\u{308}");
        assert_eq!(entities.hashtags, vec!["cafe"]);
        assert_eq!(entities.mentions, vec!["zoe"]);
    }

    #[test]
    fn test_plain_text_has_no_entities() {
        assert_eq!(extract_entities("nothing to see here"), EntitySet::default());
        assert_eq!(extract_entities(""), EntitySet::default());
    }

    #[test]
    fn test_email_address_yields_mention() {
        let entities = extract_entities("mail me at me@example.com");
        assert_eq!(entities.mentions, vec!["example"]);
    }
}
