// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based intent classification.
//!
//! Zero-cost heuristics over the raw message text: fixed trigger phrases,
//! yes/no vocabularies and search keywords. No model call, no I/O.

use std::sync::LazyLock;

use hasko_memory::{FactExtractor, USER_LOCATION, USER_NAME};
use regex::Regex;
use tracing::warn;

use crate::intent::Intent;

/// Per-chat state a classifier may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierContext {
    /// The chat has a change awaiting a yes/no reply.
    pub has_pending_change: bool,
}

/// Maps one message to an [`Intent`].
///
/// The conversation handler depends only on this trait, so a smarter
/// classifier can replace [`PatternClassifier`] without touching it.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str, ctx: &ClassifierContext) -> Intent;
}

/// Replies accepted as a "yes" to a pending change (exact match, case-insensitive).
const AFFIRMATIVE: &[&str] = &["yes", "y", "yeah", "yep", "sure", "confirm", "ok", "okay"];

/// Replies accepted as a "no" to a pending change.
const NEGATIVE: &[&str] = &["no", "n", "nope", "cancel"];

/// Search-intent keywords (contains, case-insensitive), checked in order.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "search the internet for",
    "search the web for",
    "find",
    "look up",
    "tell me about",
    "who is",
    "what is",
    "current weather in",
    "today's weather in",
    "weather today in",
    "weather forecast for",
    "latest news on",
    "news about",
    "information on",
    "details about",
];

/// Questions answered straight from memory, with the fact key they read.
static RECALL_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)\bwhat(?:'s|\s+is)\s+my\s+name\b").unwrap(),
            USER_NAME,
        ),
        (
            Regex::new(r"(?i)\bwhere\s+do\s+i\s+live\b").unwrap(),
            USER_LOCATION,
        ),
    ]
});

/// Any search keyword followed by whitespace and the query; the leftmost
/// keyword occurrence in the text wins.
static SEARCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = SEARCH_KEYWORDS
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?is)({alternatives})\s+(.+)")).unwrap()
});

/// Heuristic classifier built on [`FactExtractor`] and fixed phrase lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier {
    extractor: FactExtractor,
}

impl PatternClassifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntentClassifier for PatternClassifier {
    fn classify(&self, text: &str, ctx: &ClassifierContext) -> Intent {
        let extraction = self.extractor.extract(text);
        if !extraction.is_empty() {
            return if extraction.is_change_request {
                Intent::ChangeRequest(extraction.facts)
            } else {
                Intent::PlainFact(extraction.facts)
            };
        }

        if ctx.has_pending_change
            && let Some(accepted) = confirmation(text)
        {
            return Intent::ConfirmChange { accepted };
        }

        if let Some(key) = recall_key(text) {
            return Intent::DirectRecall { key };
        }

        if let Some(query) = search_query(text) {
            return Intent::SearchRequest { query };
        }

        Intent::Generation
    }
}

/// `Some(true)` for an affirmative reply, `Some(false)` for a negative one.
pub fn confirmation(text: &str) -> Option<bool> {
    let reply = text
        .trim()
        .trim_end_matches(['.', '!'])
        .trim()
        .to_lowercase();
    if AFFIRMATIVE.contains(&reply.as_str()) {
        Some(true)
    } else if NEGATIVE.contains(&reply.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Fact key a recall question asks about, if the text is one.
pub fn recall_key(text: &str) -> Option<&'static str> {
    RECALL_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, key)| *key)
}

/// Query text after the first search keyword occurring in the message.
///
/// Returns `None` when no keyword occurs, or when one occurs but nothing
/// follows it (logged, so the message falls through to generation).
pub fn search_query(text: &str) -> Option<String> {
    let query = SEARCH_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
        .filter(|q| !q.is_empty());

    if query.is_none() {
        let lowered = text.to_lowercase();
        if let Some(keyword) = SEARCH_KEYWORDS.iter().find(|kw| lowered.contains(*kw)) {
            warn!(keyword = %keyword, "search keyword found but no query could be extracted");
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn classify(text: &str) -> Intent {
        PatternClassifier::new().classify(text, &ClassifierContext::default())
    }

    fn classify_pending(text: &str) -> Intent {
        PatternClassifier::new().classify(
            text,
            &ClassifierContext {
                has_pending_change: true,
            },
        )
    }

    #[test]
    fn name_statement_is_plain_fact() {
        match classify("My name is Alice") {
            Intent::PlainFact(facts) => {
                assert_eq!(facts.get(USER_NAME).map(String::as_str), Some("Alice"))
            }
            other => panic!("expected PlainFact, got {other:?}"),
        }
    }

    #[test]
    fn change_phrase_is_change_request() {
        assert!(matches!(
            classify("change my name to Bob"),
            Intent::ChangeRequest(_)
        ));
    }

    #[test]
    fn what_is_my_name_is_recall_not_search() {
        assert_eq!(
            classify("what is my name"),
            Intent::DirectRecall { key: USER_NAME }
        );
        assert_eq!(
            classify("What's my name?"),
            Intent::DirectRecall { key: USER_NAME }
        );
        assert_eq!(
            classify("where do I live"),
            Intent::DirectRecall { key: USER_LOCATION }
        );
    }

    #[test]
    fn yes_without_pending_change_is_generation() {
        assert_eq!(classify("yes"), Intent::Generation);
    }

    #[test]
    fn yes_and_no_with_pending_change_confirm() {
        assert_eq!(
            classify_pending("Yes"),
            Intent::ConfirmChange { accepted: true }
        );
        assert_eq!(
            classify_pending("okay!"),
            Intent::ConfirmChange { accepted: true }
        );
        assert_eq!(
            classify_pending(" nope. "),
            Intent::ConfirmChange { accepted: false }
        );
        assert_eq!(classify_pending("yes please tell me a joke"), Intent::Generation);
    }

    #[test]
    fn search_keyword_extracts_query_preserving_case() {
        assert_eq!(
            classify("Can you look up Rust Edition 2024 please"),
            Intent::SearchRequest {
                query: "Rust Edition 2024 please".to_string()
            }
        );
        assert_eq!(
            classify("weather forecast for Oslo"),
            Intent::SearchRequest {
                query: "Oslo".to_string()
            }
        );
    }

    #[test]
    fn leftmost_keyword_in_text_wins() {
        assert_eq!(
            search_query("tell me about how to find water").as_deref(),
            Some("how to find water")
        );
        assert_eq!(
            search_query("look up who is the mayor of Lyon").as_deref(),
            Some("who is the mayor of Lyon")
        );
    }

    #[test]
    fn keyword_inside_a_word_does_not_block_a_later_keyword() {
        assert_eq!(
            search_query("I read the findings, tell me about rust").as_deref(),
            Some("rust")
        );
        assert_eq!(
            classify("I read the findings, tell me about rust"),
            Intent::SearchRequest {
                query: "rust".to_string()
            }
        );
    }

    #[test]
    fn no_keyword_means_no_query() {
        assert_eq!(search_query("the findings were inconclusive"), None);
    }

    #[test]
    #[traced_test]
    fn keyword_without_query_falls_through() {
        assert_eq!(classify("who is"), Intent::Generation);
        assert!(logs_contain("no query could be extracted"));
    }

    #[test]
    fn ordinary_chat_is_generation() {
        assert_eq!(classify("write me a haiku about tea"), Intent::Generation);
    }

    #[test]
    fn intent_display_is_snake_case() {
        assert_eq!(Intent::Generation.to_string(), "generation");
        assert_eq!(
            Intent::ConfirmChange { accepted: true }.to_string(),
            "confirm_change"
        );
    }
}
