// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-based fact extraction from a single user message.
//!
//! Captures only the first token after a trigger phrase. Multi-word values
//! ("New York") keep their first word.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{FactDelta, USER_LOCATION, USER_NAME};

/// Token captured after a trigger: letters, apostrophes and hyphens.
const VALUE: &str = r"([\p{L}'-]+)";

/// Result of scanning one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub facts: FactDelta,
    /// The facts must be confirmed before being applied.
    pub is_change_request: bool,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

struct Trigger {
    key: &'static str,
    pattern: Regex,
}

fn trigger(key: &'static str, phrase: &str) -> Trigger {
    Trigger {
        key,
        pattern: Regex::new(&format!(r"\b{phrase}\s+{VALUE}")).unwrap(),
    }
}

/// Phrases asking to replace a fact that may already be known.
static CHANGE_TRIGGERS: LazyLock<Vec<Trigger>> = LazyLock::new(|| {
    vec![
        trigger(USER_NAME, r"(?:change|update) my name to"),
        trigger(USER_LOCATION, r"(?:change|update) my location to"),
    ]
});

/// Plain assertions of a fact.
static PLAIN_TRIGGERS: LazyLock<Vec<Trigger>> = LazyLock::new(|| {
    vec![
        trigger(USER_NAME, r"my name is"),
        trigger(USER_NAME, r"call me"),
        trigger(USER_LOCATION, r"i live in"),
    ]
});

/// Stateless fact extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactExtractor;

impl FactExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scans `text` for facts.
    ///
    /// Change phrases take precedence: when any fires, only change facts are
    /// returned and `is_change_request` is set.
    pub fn extract(&self, text: &str) -> Extraction {
        let lowered = text.to_lowercase();

        let change = scan(&CHANGE_TRIGGERS, &lowered);
        if !change.is_empty() {
            return Extraction {
                facts: change,
                is_change_request: true,
            };
        }

        Extraction {
            facts: scan(&PLAIN_TRIGGERS, &lowered),
            is_change_request: false,
        }
    }
}

fn scan(triggers: &[Trigger], lowered: &str) -> FactDelta {
    let mut facts = FactDelta::new();
    for trigger in triggers {
        if facts.contains_key(trigger.key) {
            continue;
        }
        if let Some(value) = trigger
            .pattern
            .captures(lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| title_case(m.as_str().trim_matches(|c| c == '\'' || c == '-')))
            .filter(|v| !v.is_empty())
        {
            facts.insert(trigger.key.to_string(), value);
        }
    }
    facts
}

/// Uppercases each letter that follows a non-letter, lowercases the rest.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            out.push(c);
            at_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(extraction: &Extraction) -> Vec<(&str, &str)> {
        extraction
            .facts
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn my_name_is_yields_title_cased_name() {
        let extractor = FactExtractor::new();
        for message in ["My name is Alice", "my name is alice", "Hi! MY NAME IS ALICE."] {
            let out = extractor.extract(message);
            assert_eq!(facts(&out), vec![(USER_NAME, "Alice")], "{message}");
            assert!(!out.is_change_request);
        }
    }

    #[test]
    fn only_first_token_is_captured() {
        let out = FactExtractor::new().extract("my name is mary ann smith");
        assert_eq!(out.facts.get(USER_NAME).map(String::as_str), Some("Mary"));
    }

    #[test]
    fn change_phrase_sets_change_flag() {
        let extractor = FactExtractor::new();
        for message in ["change my name to Bob", "Please update my name to bob!"] {
            let out = extractor.extract(message);
            assert_eq!(facts(&out), vec![(USER_NAME, "Bob")], "{message}");
            assert!(out.is_change_request);
        }
    }

    #[test]
    fn change_wins_when_both_fire() {
        let out = FactExtractor::new().extract("my name is Alice, change my name to Bob");
        assert!(out.is_change_request);
        assert_eq!(facts(&out), vec![(USER_NAME, "Bob")]);
    }

    #[test]
    fn no_trigger_yields_empty() {
        let out = FactExtractor::new().extract("tell me a joke about names");
        assert!(out.is_empty());
        assert!(!out.is_change_request);
    }

    #[test]
    fn call_me_and_location() {
        let out = FactExtractor::new().extract("call me ziggy, i live in oslo");
        assert_eq!(
            facts(&out),
            vec![(USER_LOCATION, "Oslo"), (USER_NAME, "Ziggy")]
        );
    }

    #[test]
    fn location_change_request() {
        let out = FactExtractor::new().extract("update my location to Bergen");
        assert!(out.is_change_request);
        assert_eq!(out.facts.get(USER_LOCATION).map(String::as_str), Some("Bergen"));
    }

    #[test]
    fn trigger_must_start_at_word_boundary() {
        assert!(FactExtractor::new().extract("enemy name is nobody").is_empty());
    }

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("o'brien"), "O'Brien");
        assert_eq!(title_case("mary-jane"), "Mary-Jane");
        assert_eq!(title_case("élodie"), "Élodie");
    }
}
