// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed user-facing replies.

use hasko_memory::{USER_LOCATION, USER_NAME};

pub const CONFIRM_CHANGE: &str =
    "Are you sure you want to update this information? Please reply with 'Yes' or 'No'.";
pub const CHANGE_APPLIED: &str = "Done! I've updated your information.";
pub const CHANGE_DISCARDED: &str = "Okay, I won't change anything.";
pub const SEARCH_PREAMBLE: &str = "Here's what I found:\n\n";

/// Streamed in place of the reply when the inference server fails over HTTP.
pub const GENERATION_FAILED: &str = "I encountered an error while processing your request.";

/// Streamed in place of the reply for any other failure.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred while processing your request.";

/// Acknowledgment after storing new facts.
pub fn acknowledge(user_name: Option<&str>) -> String {
    format!("Got it, {}!", user_name.unwrap_or("there"))
}

/// Answer to a recall question about `key`.
pub fn recall(key: &str, value: Option<&str>) -> String {
    match (key, value) {
        (USER_NAME, Some(name)) => format!("Your name is {name}."),
        (USER_NAME, None) => {
            "I don't know your name yet. Could you please tell me your name?".to_string()
        }
        (USER_LOCATION, Some(place)) => format!("You live in {place}."),
        (USER_LOCATION, None) => "I don't know where you live yet. Could you tell me?".to_string(),
        (_, Some(value)) => format!("I remember: {value}."),
        (_, None) => "I don't know that yet.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledge_falls_back_to_there() {
        assert_eq!(acknowledge(Some("Alice")), "Got it, Alice!");
        assert_eq!(acknowledge(None), "Got it, there!");
    }

    #[test]
    fn recall_replies() {
        assert_eq!(recall(USER_NAME, Some("Alice")), "Your name is Alice.");
        assert_eq!(recall(USER_LOCATION, Some("Oslo")), "You live in Oslo.");
        assert!(recall(USER_NAME, None).starts_with("I don't know your name yet."));
    }
}
