//! Prompt templates for the planner and the solver

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::domain::OperationInfo;

const PLANNER_TEMPLATE: &str = r##"You are a meticulous planning assistant that creates precise step-by-step plans to solve tasks using available tools. You must follow these rules exactly:
1. IMPORTANT: Each variable reference (#E1, #E2, etc.) MUST contain the EXACT result from the specific step where it was created
2. CRITICAL: The SendMessage tool requires: senderId, content, conversationId, and should NOT use conversationId as receiverId
3. All tool inputs MUST use proper JSON format with keys matching the required parameters
4. Each plan must describe ONE specific action followed by ONE tool call with its corresponding #E variable
5. When referencing user IDs from search results, you MUST use the exact variable (e.g., #E1) without quotes
6. Use the LLM tool with a plain text prompt only when no other tool fits
You are working with user ID: {actor_id}
Available tools:
{operations}

CORRECT EXAMPLES FOR REFERENCE:
Example 1: Send a message to John saying hello
Plan 1: Find John's user ID using name search.
#E1 = SearchUserByName[{"name": "John"}]
Plan 2: Find or create a conversation between current user and John.
#E2 = FindConversationIdByParticipants[{"participants": ["{actor_id}", #E1]}]
Plan 3: Send the message in the identified conversation.
#E3 = SendMessage[{"senderId": "{actor_id}", "receiverId": #E1, "content": "Hello", "conversationId": #E2}]

Example 2: What were my last 5 messages?
Plan 1: Retrieve the last 5 messages sent by the user.
#E1 = GetLastSentMessages[{"senderId": "{actor_id}", "limit": 5}]

Example 3: Get statistics for my conversation with Mike
Plan 1: Find Mike's user ID
#E1 = SearchUserByName[{"name": "Mike"}]
Plan 2: Find our conversation ID
#E2 = FindConversationIdByParticipants[{"participants": ["{actor_id}", #E1]}]
Plan 3: Get conversation statistics
#E3 = GetConversationStatistics[{"conversationId": #E2}]

COMMON MISTAKES TO AVOID:
- DO NOT use #E2 as both conversationId and receiverId
- DO NOT omit required parameters for any tool
- DO NOT use plan numbers that don't match the sequence (#E2 must come after #E1)
Begin! Create your step-by-step plan with precise tool calls and variable references.
Task: {task}"##;

const SOLVER_TEMPLATE: &str = r##"Your task is to process raw JSON data and generate human-readable, GitHub-flavored Markdown responses. Your responses must be structured, clear, and formatted appropriately based on the type of data provided.

Formatting Guidelines:
Use headings (##, ###) to organize information when necessary.
Use bold (**text**) and italic (*text*) for emphasis when appropriate.
Use tables when presenting structured data such as statistics or comparisons.
Use lists (-, *, or 1.) when displaying multiple related items such as messages.
Format timestamps as normal text while emphasizing key content (e.g., message text in bold).

Response Formatting Logic:
If the data is an array of messages, return a bulleted list with bold content and timestamps in normal text.
Example:
* **Hello, what's up?** - Mar 4, 5:59 AM

If the task involves sending a message, return a confirmation with ✅ and the content.
Example:
✅ **Hello, Dhruv!** message sent to Dhruv.

If the data contains numeric statistics, format it as a table.
Example:
| Metric            | Count |
|-------------------|-------|
| Sent Messages     | 10    |
| Received Messages | 8     |

If the data contains key-value pairs that do not fit a table, use bold for keys and normal text for values.
Example:
**Status:** Active

Current Query Context: {task}
Database Response: {agent_response}
OUTPUT: Strictly formatted markdown using ONLY provided data
"##;

const SMART_REPLY_TEMPLATE: &str = r##"# Conversation Reply Generator
You are given a list of messages from a conversation. Understand its context and write 3 possible replies to the last message in the style and language of the receiver.

## Format Requirements:
- Only output a JSON object with a single key "replies" holding an array of 3 reply strings
- No extra text before or after the JSON
- No explanations and no user labels
- Respect the language of the conversation (English, Hindi, Gujarati, Hinglish, etc.)
- Match the tone of the conversation, including formal or informal forms of address
- Always respond in the exact language of the last message

## Example:
Conversation:
[
  {"sender": "user1", "message": "Kal movie dekhne chalein?"},
  {"sender": "user2", "message": "Haan, but mujhe thoda late ho jayega office se."},
  {"sender": "user1", "message": "Koi baat nahi. Kitne baje tak pahunch paoge?"}
]
Output:
{"replies": ["Shayad 7:30 tak.", "8 baje tak pakka pahunch jaunga.", "Office se 6:30 niklunga, chalega?"]}

## Conversation:
{conversation}
"##;

/// Render the planning prompt for one actor and task
pub fn planner_prompt(actor_id: &str, catalog: &[OperationInfo], task: &str) -> String {
    let operations = render_catalog(catalog);
    fill(
        PLANNER_TEMPLATE,
        &[("operations", &operations), ("actor_id", actor_id), ("task", task)],
    )
}

/// Render the synthesis prompt; a missing result is shown as `null`
pub fn solver_prompt(task: &str, agent_response: Option<&str>) -> String {
    fill(
        SOLVER_TEMPLATE,
        &[("task", task), ("agent_response", agent_response.unwrap_or("null"))],
    )
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Substitute every `{name}` in one pass so inserted text is never rescanned
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

/// Render the reply-suggestion prompt around a JSON array of conversation lines
pub fn smart_reply_prompt(conversation_json: &str) -> String {
    fill(SMART_REPLY_TEMPLATE, &[("conversation", conversation_json)])
}

/// One numbered line per operation: `(1) Name(param: type, opt?: type): description`
pub fn render_catalog(catalog: &[OperationInfo]) -> String {
    catalog
        .iter()
        .enumerate()
        .map(|(i, info)| {
            format!(
                "({}) {}({}): {}",
                i + 1,
                info.name,
                render_signature(&info.parameters),
                info.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_signature(schema: &Value) -> String {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return String::new();
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, property)| {
            let marker = if required.contains(&name.as_str()) { "" } else { "?" };
            format!("{}{}: {}", name, marker, type_name(property))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_name(property: &Value) -> String {
    let primary = match property.get("type") {
        Some(Value::String(name)) => name.as_str(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .unwrap_or("any"),
        _ => "any",
    };

    match primary {
        "integer" => "number".to_string(),
        "array" => {
            let item = property.get("items").map(type_name);
            format!("{}[]", item.unwrap_or_else(|| "any".to_string()))
        }
        other => other.to_string(),
    }
}
