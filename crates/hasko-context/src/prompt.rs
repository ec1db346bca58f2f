// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic prompt assembly.
//!
//! Order: persona block, remembered facts, optional web block, prior turns,
//! a no-code reminder, then the latest user message and an open assistant
//! line. History is never truncated here.

use std::collections::BTreeMap;
use std::fmt::Write;

use hasko_core::{Role, Turn};

use crate::persona::Persona;

const NO_CODE_REMINDER: &str = "Please ensure that your responses do not contain code unless explicitly requested by the user.\n\
Respond appropriately to the user's messages based on their content.\n\n";

/// Builds single-string prompts for one persona.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: Persona,
}

impl PromptBuilder {
    pub fn new(persona: Persona) -> Self {
        Self { persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Assembles the prompt for the next assistant turn.
    ///
    /// `history` must not yet contain `latest`.
    pub fn build(
        &self,
        history: &[Turn],
        memory_store: &BTreeMap<String, String>,
        latest: &str,
        web_summary: Option<&str>,
    ) -> String {
        let name = self.persona.name();
        let mut prompt = String::new();

        prompt.push_str(self.persona.instructions());
        prompt.push_str("\n\n");

        for (key, value) in memory_store {
            let _ = writeln!(prompt, "{}: {value}", readable_key(key));
        }

        if let Some(summary) = web_summary.filter(|s| !s.trim().is_empty()) {
            let _ = write!(
                prompt,
                "Use the following information retrieved from the web to answer the user's question:\n{}\n\n",
                summary.trim()
            );
        }

        for turn in history {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => name,
            };
            let _ = writeln!(prompt, "{speaker}: {}", turn.content);
        }

        prompt.push_str(NO_CODE_REMINDER);
        let _ = write!(prompt, "User: {latest}\n{name}:");
        prompt
    }
}

/// Human-readable label for a fact key: `user_name` -> `User's Name`.
pub fn readable_key(key: &str) -> String {
    let mut words = key.split('_').filter(|w| !w.is_empty()).peekable();
    let mut out = Vec::new();
    if words.peek() == Some(&"user") {
        words.next();
        out.push("User's".to_string());
    }
    out.extend(words.map(capitalize));
    out.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(Persona::new("Hasko", "You are Hasko."))
    }

    #[test]
    fn readable_keys() {
        assert_eq!(readable_key("user_name"), "User's Name");
        assert_eq!(readable_key("user_location"), "User's Location");
        assert_eq!(readable_key("favorite_color"), "Favorite Color");
    }

    #[test]
    fn empty_history_prompt() {
        let prompt = builder().build(&[], &BTreeMap::new(), "hi", None);
        assert_eq!(
            prompt,
            format!("You are Hasko.\n\n{NO_CODE_REMINDER}User: hi\nHasko:")
        );
    }

    #[test]
    fn sections_appear_in_order() {
        let history = vec![Turn::user("my name is alice"), Turn::assistant("Got it, Alice!")];
        let facts = BTreeMap::from([("user_name".to_string(), "Alice".to_string())]);
        let prompt = builder().build(&history, &facts, "tell me a joke", Some("Jokes are funny."));

        let persona = prompt.find("You are Hasko.").unwrap();
        let fact = prompt.find("User's Name: Alice\n").unwrap();
        let web = prompt.find("Jokes are funny.").unwrap();
        let user_turn = prompt.find("User: my name is alice\n").unwrap();
        let assistant_turn = prompt.find("Hasko: Got it, Alice!\n").unwrap();
        let reminder = prompt.find("Please ensure").unwrap();

        assert!(persona < fact && fact < web && web < user_turn);
        assert!(user_turn < assistant_turn && assistant_turn < reminder);
        assert!(prompt.ends_with("User: tell me a joke\nHasko:"));
    }

    #[test]
    fn blank_web_summary_is_omitted() {
        let prompt = builder().build(&[], &BTreeMap::new(), "hi", Some("  "));
        assert!(!prompt.contains("retrieved from the web"));
    }

    #[test]
    fn history_uses_persona_name() {
        let builder = PromptBuilder::new(Persona::new("Juno", "You are Juno."));
        let prompt = builder.build(&[Turn::assistant("hello")], &BTreeMap::new(), "hey", None);
        assert!(prompt.contains("Juno: hello\n"));
        assert!(prompt.ends_with("\nJuno:"));
    }
}
