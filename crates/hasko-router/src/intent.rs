// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed set of outcomes a classifier may produce.

use hasko_memory::FactDelta;

/// What the conversation handler should do with a message.
///
/// Variants are listed in the priority order the pattern classifier checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The user asks to replace remembered facts; needs confirmation first.
    ChangeRequest(FactDelta),
    /// The user states new facts to remember.
    PlainFact(FactDelta),
    /// A yes/no reply to a pending change.
    ConfirmChange { accepted: bool },
    /// A question answerable from memory alone.
    DirectRecall { key: &'static str },
    /// A request for live web information.
    SearchRequest { query: String },
    /// Anything else: stream a model reply.
    Generation,
}

impl Intent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::ChangeRequest(_) => "change_request",
            Intent::PlainFact(_) => "plain_fact",
            Intent::ConfirmChange { .. } => "confirm_change",
            Intent::DirectRecall { .. } => "direct_recall",
            Intent::SearchRequest { .. } => "search_request",
            Intent::Generation => "generation",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
