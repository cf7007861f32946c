//! Plan text parser
//!
//! Planner output is free-form prose interleaved with step units of the shape
//!
//! ```text
//! Plan 1: Find the user called John
//! #E1 = SearchUserByName[{"name": "John"}]
//! ```
//!
//! Recognition is lenient about headings, markdown emphasis and whitespace.
//! Once a unit is recognised, its title, operation and parameter blob must all
//! be present or the whole plan is rejected.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{PlanDocument, PlanStep};
use crate::domain::workflow::WorkflowError;

/// Capture groups: 1 = title, 2 = step id, 3 = operation, 4 = parameter blob.
/// The blob may hold one level of nested braces. Titles may mention earlier
/// step ids; the shortest title that still leaves a full unit wins.
static STEP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:##\s*Plan\s*\d*:?|Plan\s*\d*:)?\s*(?:\*\*)?(?:Plan:)?(?:\*\*)?\s*([^\n]*?)(?:\n|\s*\*\*)*\s*(?:\*\*)?(#E\d+)?\s*=?\s*(\w+)\s*\[\s*(\{(?:[^{}]|(?:\{[^{}]*\}))*\})\s*\]",
    )
    .unwrap()
});

/// Text that only appears at the start of a step unit
static UNIT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#E\d+\s*=|Plan\s*\d+\s*:").unwrap());

/// Leading markup left on a title when a match starts before its heading
static TITLE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#+\s*)?(?:\*\*)?\s*(?:Plan\s*\d*\s*:)?\s*(?:\*\*)?").unwrap()
});

/// Parse raw planner output into a validated plan document
pub fn parse_plan(raw_text: &str) -> Result<PlanDocument, WorkflowError> {
    let mut steps = Vec::new();
    let mut covered = Vec::new();

    for captures in STEP_PATTERN.captures_iter(raw_text) {
        let raw_title = captures.get(1).map_or("", |m| m.as_str());
        let step_id = captures.get(2).map_or("", |m| m.as_str().trim());
        let operation = captures.get(3).map_or("", |m| m.as_str().trim());
        let params = captures.get(4).map_or("", |m| m.as_str().trim());

        let title = clean_title(raw_title);
        if title.is_empty() || operation.is_empty() || params.is_empty() {
            return Err(WorkflowError::plan_parse(format!(
                "Invalid plan step format near '{}'",
                captures.get(0).map_or("", |m| m.as_str().trim())
            )));
        }

        if let Some(unit) = captures.get(0) {
            covered.push(unit.range());
        }
        steps.push(PlanStep::new(title, step_id, operation, params));
    }

    if let Some(marker) = UNIT_MARKER
        .find_iter(raw_text)
        .find(|m| !covered.iter().any(|span| span.contains(&m.start())))
    {
        return Err(WorkflowError::plan_parse(format!(
            "Unrecognised plan step near '{}'",
            line_at(raw_text, marker.start())
        )));
    }

    if steps.is_empty() {
        return Err(WorkflowError::plan_parse(
            "No valid steps found in the generated plan",
        ));
    }

    PlanDocument::new(steps, raw_text)
}

fn line_at(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = text[offset..].find('\n').map_or(text.len(), |i| offset + i);
    text[start..end].trim()
}

fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = TITLE_PREFIX.replace(trimmed, "");
    let cleaned = stripped.trim().trim_end_matches('*').trim();

    if cleaned.is_empty() {
        trimmed.trim_matches('*').trim().to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_step_plan() {
        let doc = parse_plan(r#"Plan 1: lookup. #E1 = Lookup[{"name":"Ann"}]"#).unwrap();

        assert_eq!(doc.len(), 1);
        let step = &doc.steps()[0];
        assert_eq!(step.title(), "lookup.");
        assert_eq!(step.step_id(), "#E1");
        assert_eq!(step.operation(), "Lookup");
        assert_eq!(step.params_template(), r#"{"name":"Ann"}"#);
    }

    #[test]
    fn test_parse_multi_line_plan_in_order() {
        let raw = r#"Plan 1: Find the user called John
#E1 = SearchUserByName[{"name": "John"}]
Plan 2: Find the conversation with John
#E2 = FindConversationIdByParticipants[{"participants": ["u-1", #E1]}]
Plan 3: Send the greeting
#E3 = SendMessage[{"senderId": "u-1", "receiverId": #E1, "content": "Hello", "conversationId": #E2}]"#;

        let doc = parse_plan(raw).unwrap();

        assert_eq!(doc.len(), 3);
        let titles: Vec<_> = doc.steps().iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Find the user called John",
                "Find the conversation with John",
                "Send the greeting"
            ]
        );
        let ids: Vec<_> = doc.steps().iter().map(|s| s.step_id()).collect();
        assert_eq!(ids, vec!["#E1", "#E2", "#E3"]);
        assert_eq!(doc.steps()[1].operation(), "FindConversationIdByParticipants");
        assert_eq!(
            doc.steps()[1].params_template(),
            r#"{"participants": ["u-1", #E1]}"#
        );
        assert_eq!(doc.raw_text(), raw);
    }

    #[test]
    fn test_parse_markdown_headings() {
        let raw = r#"## Plan 1: **Look up Jane**
#E1 = SearchUserByName[{"name": "Jane"}]

**Plan:** Fetch her details
#E2 = GetUserDetails[{"userId": #E1}]"#;

        let doc = parse_plan(raw).unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.steps()[0].title(), "Look up Jane");
        assert_eq!(doc.steps()[1].title(), "Fetch her details");
        assert_eq!(doc.steps()[1].operation(), "GetUserDetails");
    }

    #[test]
    fn test_parse_nested_braces() {
        let raw = r#"Plan 1: Create it
#E1 = Create[{"filter": {"name": "Ann"}, "limit": 2}]"#;

        let doc = parse_plan(raw).unwrap();

        assert_eq!(
            doc.steps()[0].params_template(),
            r#"{"filter": {"name": "Ann"}, "limit": 2}"#
        );
    }

    #[test]
    fn test_parse_step_without_id() {
        let doc = parse_plan("Plan 1: Say hello LLM[{Say hello to the user}]").unwrap();

        assert_eq!(doc.steps()[0].step_id(), "");
        assert_eq!(doc.steps()[0].operation(), "LLM");
        assert_eq!(doc.steps()[0].params_template(), "{Say hello to the user}");
    }

    #[test]
    fn test_prose_between_steps_is_ignored() {
        let raw = r#"Sure, here is the plan.

Plan 1: Count my messages
#E1 = GetUserMessageStatistics[{"userId": "u-1"}]

That should be all."#;

        let doc = parse_plan(raw).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.steps()[0].operation(), "GetUserMessageStatistics");
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(matches!(parse_plan(""), Err(WorkflowError::PlanParse(_))));
    }

    #[test]
    fn test_text_without_steps_fails() {
        let result = parse_plan("I am not sure how to help with that.");
        assert!(matches!(result, Err(WorkflowError::PlanParse(_))));
    }

    #[test]
    fn test_unit_without_title_fails_whole_parse() {
        let raw = r#"Plan 1: Find John
#E1 = SearchUserByName[{"name": "John"}]
#E2 = GetUserDetails[{"userId": #E1}]"#;

        let result = parse_plan(raw);
        assert!(matches!(result, Err(WorkflowError::PlanParse(_))));
    }

    #[test]
    fn test_unterminated_middle_unit_fails_whole_parse() {
        let raw = r#"Plan 1: Find John
#E1 = SearchUserByName[{"name": "John"}]
Plan 2: Find the conversation
#E2 = FindConversationIdByParticipants[{"participants": ["u-1", #E1]
Plan 3: Send the greeting
#E3 = SendMessage[{"conversationId": #E2}]"#;

        let err = parse_plan(raw).unwrap_err();
        assert!(matches!(err, WorkflowError::PlanParse(_)));
        assert!(err.to_string().contains("Plan 2: Find the conversation"));
    }

    #[test]
    fn test_doubly_nested_blob_fails_whole_parse() {
        let raw = r#"Plan 1: Find John
#E1 = SearchUserByName[{"name": "John"}]
Plan 2: Filter deeply
#E2 = Filter[{"f": {"g": {"h": 1}}}]"#;

        let err = parse_plan(raw).unwrap_err();
        assert!(matches!(err, WorkflowError::PlanParse(_)));
    }

    #[test]
    fn test_marker_inside_params_is_not_a_unit() {
        let raw = r#"Plan 1: Quote the plan
#E1 = SendMessage[{"content": "Plan 2: #E9 = nothing"}]"#;

        let doc = parse_plan(raw).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_title_may_mention_earlier_step() {
        let raw = r#"Plan 1: Find the conversation
#E1 = FindConversationIdByParticipants[{"participants": ["u-1", "u-2"]}]
Plan 2: Get stats for conversation #E1
#E2 = GetConversationStatistics[{"conversationId": #E1}]"#;

        let doc = parse_plan(raw).unwrap();
        let titles: Vec<_> = doc.steps().iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec!["Find the conversation", "Get stats for conversation #E1"]
        );
        assert_eq!(doc.steps()[1].step_id(), "#E2");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Plan 2: Send it "), "Send it");
        assert_eq!(clean_title("**Plan 3:** Check stats**"), "Check stats");
        assert_eq!(clean_title("## Plan 1: Look"), "Look");
        assert_eq!(clean_title("Just words"), "Just words");
        assert_eq!(clean_title(""), "");
    }
}
