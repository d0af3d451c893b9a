//! Prompts and response schemas for each gateway operation.

use draftcheck_llm::ResponseSchema;

use crate::models::analysis::{AiLabel, ClaimStatus, Severity, SuggestionType};

pub(super) const EDITOR_SYSTEM_PROMPT: &str =
    "You are a meticulous copy editor and fact checker for long-form writing. \
     Quote the author's text exactly as written when referring to it.";

pub(super) fn grammar_prompt(text: &str) -> String {
    format!(
        "Review the following text for grammar, spelling, style and clarity problems.\n\
         For every problem return one item where:\n\
         - originalText is the exact, verbatim span from the text (copy it character for character)\n\
         - suggestedText is the replacement for that span only\n\
         - explanation is one short sentence\n\
         - type is Grammar, Spelling, Style or Clarity\n\
         - severity is Critical, Major or Minor\n\
         Return an empty array if the text has no problems.\n\n\
         Text:\n{text}"
    )
}

pub(super) fn sources_prompt(prefix: &str) -> String {
    format!(
        "Search the web for reliable sources that support or discuss the factual \
         statements in the following text. Briefly state which statements are \
         backed by what you found.\n\n\
         Text:\n{prefix}"
    )
}

pub(super) fn claims_prompt(text: &str) -> String {
    format!(
        "Identify each distinct factual claim in the following text and fact-check it \
         with a web search.\n\
         For every claim return:\n\
         - claim: the claim as stated\n\
         - status: Verified, Questionable, False or Unverifiable\n\
         - explanation: what the evidence shows, in one or two sentences\n\
         - sources: the pages you relied on, each with url and title\n\
         Return an empty array if the text makes no factual claims.\n\n\
         Text:\n{text}"
    )
}

pub(super) fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following text in one concise paragraph. Keep the author's \
         main argument and key findings; do not add opinions.\n\n\
         Text:\n{text}"
    )
}

pub(super) fn ai_detection_prompt(prefix: &str) -> String {
    format!(
        "Estimate how likely it is that the following text was written by an AI model.\n\
         Return:\n\
         - score: an integer from 0 (certainly human) to 100 (certainly AI)\n\
         - label: Likely Human, Mixed Signals or Likely AI-Generated\n\
         - explanation: the stylistic signals behind the score, in two sentences at most\n\n\
         Text:\n{prefix}"
    )
}

pub(super) const TRANSCRIBE_PROMPT: &str =
    "Transcribe all text in this file verbatim. Preserve paragraphs and line breaks. \
     Do not summarize, translate, correct or comment on the content. \
     Output only the transcribed text.";

pub(super) fn suggestions_schema() -> ResponseSchema {
    ResponseSchema::array(
        Some("Problems found in the text"),
        ResponseSchema::object(
            None,
            vec![
                ("originalText", ResponseSchema::string(Some("Verbatim span from the text"))),
                ("suggestedText", ResponseSchema::string(Some("Replacement for the span"))),
                ("explanation", ResponseSchema::string(None)),
                ("type", ResponseSchema::string_enum(None, &SuggestionType::ALL)),
                ("severity", ResponseSchema::string_enum(None, &Severity::ALL)),
            ],
        ),
    )
}

pub(super) fn claims_schema() -> ResponseSchema {
    let source = ResponseSchema::object(
        None,
        vec![
            ("url", ResponseSchema::string(None)),
            ("title", ResponseSchema::string(None)),
            ("snippet", ResponseSchema::string(None)),
        ],
    )
    .optional("snippet");

    ResponseSchema::array(
        Some("Fact-checked claims"),
        ResponseSchema::object(
            None,
            vec![
                ("claim", ResponseSchema::string(None)),
                ("status", ResponseSchema::string_enum(None, &ClaimStatus::ALL)),
                ("explanation", ResponseSchema::string(None)),
                ("sources", ResponseSchema::array(None, source)),
            ],
        ),
    )
}

pub(super) fn ai_detection_schema() -> ResponseSchema {
    ResponseSchema::object(
        Some("AI authorship estimate"),
        vec![
            ("score", ResponseSchema::integer(Some("0 to 100"))),
            ("label", ResponseSchema::string_enum(None, &AiLabel::ALL)),
            ("explanation", ResponseSchema::string(None)),
        ],
    )
}
