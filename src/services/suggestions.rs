//! Suggestion Application Engine
//!
//! Commits accepted corrections into the document and retires them from the
//! pending list.
//!
//! Matching is a literal, case-sensitive search for the first occurrence of
//! the suggestion's original text. When the text is no longer there (edited
//! since the scan, or never reproduced exactly by the model) the document is
//! left untouched. Either way the suggestion leaves the pending list.

use serde::{Deserialize, Serialize};

use draftcheck_core::replace_first;

use crate::models::analysis::Suggestion;
use crate::models::document::Document;

/// What happened to the document when a suggestion was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The first occurrence was replaced
    Applied,
    /// The original text was not found; the document is unchanged
    TextNotFound,
    /// No pending suggestion has this id
    UnknownSuggestion,
}

/// Totals for accepting every pending suggestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyAllReport {
    pub applied: usize,
    pub not_found: usize,
}

/// Apply one suggestion and remove it (by id) from `pending`.
pub fn apply_suggestion(
    document: &mut Document,
    pending: &mut Vec<Suggestion>,
    suggestion: &Suggestion,
) -> ApplyOutcome {
    let outcome = match replace_first(
        &document.text,
        &suggestion.original_text,
        &suggestion.suggested_text,
    ) {
        Some(updated) => {
            document.text = updated;
            ApplyOutcome::Applied
        }
        None => {
            tracing::debug!(id = %suggestion.id, "Original text not found, document unchanged");
            ApplyOutcome::TextNotFound
        }
    };
    pending.retain(|s| s.id != suggestion.id);
    outcome
}

/// Look up a pending suggestion by id and apply it.
pub fn apply_by_id(document: &mut Document, pending: &mut Vec<Suggestion>, id: &str) -> ApplyOutcome {
    match pending.iter().find(|s| s.id == id).cloned() {
        Some(suggestion) => apply_suggestion(document, pending, &suggestion),
        None => ApplyOutcome::UnknownSuggestion,
    }
}

/// Apply every pending suggestion in list order.
///
/// Each application sees the text left by the previous one.
pub fn apply_all(document: &mut Document, pending: &mut Vec<Suggestion>) -> ApplyAllReport {
    let mut report = ApplyAllReport::default();
    for suggestion in pending.clone() {
        match apply_suggestion(document, pending, &suggestion) {
            ApplyOutcome::Applied => report.applied += 1,
            _ => report.not_found += 1,
        }
    }
    report
}

/// Drop a suggestion without touching the document.
pub fn dismiss(pending: &mut Vec<Suggestion>, id: &str) -> bool {
    let before = pending.len();
    pending.retain(|s| s.id != id);
    pending.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{Severity, SuggestionType};

    fn suggestion(id: &str, original: &str, suggested: &str) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            original_text: original.to_string(),
            suggested_text: suggested.to_string(),
            explanation: String::new(),
            suggestion_type: SuggestionType::Style,
            severity: Severity::Minor,
        }
    }

    #[test]
    fn test_apply_replaces_first_occurrence_only() {
        let mut doc = Document::new(
            "t",
            "We utilize a qualitative lens. Later we utilize a qualitative survey.",
        );
        let s = suggestion("sug-0-1", "utilize a qualitative", "use a qualitative");
        let mut pending = vec![s.clone(), suggestion("sug-1-1", "lens", "view")];

        let outcome = apply_suggestion(&mut doc, &mut pending, &s);

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(
            doc.text,
            "We use a qualitative lens. Later we utilize a qualitative survey."
        );
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "sug-1-1");
    }

    #[test]
    fn test_apply_missing_text_is_silent_noop_but_removes() {
        let mut doc = Document::new("t", "Nothing to see here.");
        let s = suggestion("sug-0-1", "utilize a qualitative", "use a qualitative");
        let mut pending = vec![s.clone()];

        let outcome = apply_suggestion(&mut doc, &mut pending, &s);

        assert_eq!(outcome, ApplyOutcome::TextNotFound);
        assert_eq!(doc.text, "Nothing to see here.");
        assert!(pending.is_empty());
    }

    #[test]
    fn test_apply_is_case_sensitive() {
        let mut doc = Document::new("t", "Utilize a Qualitative approach");
        let s = suggestion("a", "utilize a qualitative", "use a qualitative");
        let mut pending = vec![s.clone()];
        assert_eq!(apply_suggestion(&mut doc, &mut pending, &s), ApplyOutcome::TextNotFound);
        assert_eq!(doc.text, "Utilize a Qualitative approach");
    }

    #[test]
    fn test_apply_by_unknown_id() {
        let mut doc = Document::new("t", "text");
        let mut pending = vec![suggestion("a", "text", "words")];
        assert_eq!(
            apply_by_id(&mut doc, &mut pending, "missing"),
            ApplyOutcome::UnknownSuggestion
        );
        assert_eq!(pending.len(), 1);
        assert_eq!(doc.text, "text");
    }

    #[test]
    fn test_apply_all_in_order() {
        let mut doc = Document::new("t", "Researchers has found that results suggests more.");
        let mut pending = vec![
            suggestion("a", "has found", "have found"),
            suggestion("b", "results suggests", "results suggest"),
            suggestion("c", "absent phrase", "whatever"),
        ];
        let report = apply_all(&mut doc, &mut pending);
        assert_eq!(report, ApplyAllReport { applied: 2, not_found: 1 });
        assert_eq!(doc.text, "Researchers have found that results suggest more.");
        assert!(pending.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut pending = vec![suggestion("a", "x", "y"), suggestion("b", "x", "z")];
        assert!(dismiss(&mut pending, "a"));
        assert!(!dismiss(&mut pending, "a"));
        assert_eq!(pending.len(), 1);
    }
}
