//! Document Model
//!
//! The text being edited, with the title shown above it.

use serde::{Deserialize, Serialize};

/// Title used for the built-in sample and for pasted text
pub const UNTITLED: &str = "Untitled Document";

const SAMPLE_TEXT: &str = "The study aims to utilize a qualitative approach to understand \
how remote teams communicate. Researchers has interviewed twenty participants across \
three companies. Remote work was first introduced in 1973 by NASA engineer Jack Nilles, \
who coined the term telecommuting. The results suggests that asynchronous tools reduce \
meeting load, however they also increase the time it takes to reach a decision.";

/// A single document owned by the active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub title: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
        }
    }

    /// The placeholder document a fresh session starts with
    pub fn sample() -> Self {
        Self::new(UNTITLED, SAMPLE_TEXT)
    }

    /// Whitespace-only text counts as empty
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::sample()
    }
}
