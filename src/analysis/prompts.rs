//! Prompt construction for review and refactor requests.

use crate::llm::ChatMessage;
use crate::types::{ChangeType, IssueType};

const REVIEW_SYSTEM: &str = "You are an expert code reviewer. \
Answer with a single JSON object and nothing else.";

const REFACTOR_SYSTEM: &str = "You are an expert software engineer who refactors code. \
Answer with a single JSON object and nothing else.";

/// Wrap `code` in a fenced block that its own backtick runs cannot close.
pub fn fenced(code: &str, language: Option<&str>) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);

    let mut block = String::with_capacity(code.len() + 2 * fence.len() + 16);
    block.push_str(&fence);
    block.push_str(language.unwrap_or(""));
    block.push('\n');
    block.push_str(code);
    if !code.ends_with('\n') {
        block.push('\n');
    }
    block.push_str(&fence);
    block
}

fn quoted_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Messages for a quality review of `code`.
pub fn review_messages(code: &str, language: Option<&str>) -> Vec<ChatMessage> {
    let prompt = format!(
        r#"Review the following code for correctness, security, performance and maintainability.

{code}

Respond with a JSON object of exactly this shape:
{{
  "summary": "a short overall assessment of the code",
  "issues": [
    {{ "type": "error", "line": 1, "message": "what is wrong and how to fix it" }}
  ],
  "score": 0
}}

Rules:
- "type" must be one of {types}.
- "line" must be the real line number in the code above, counting from 1.
- "score" must be an integer from 0 to 100, where 100 is flawless code.
- Use an empty "issues" array when there is nothing to report."#,
        code = fenced(code, language),
        types = quoted_list(&IssueType::ALL),
    );

    vec![ChatMessage::system(REVIEW_SYSTEM), ChatMessage::user(prompt)]
}

/// Messages for a behaviour-preserving refactor of `code`.
pub fn refactor_messages(code: &str, language: Option<&str>) -> Vec<ChatMessage> {
    let prompt = format!(
        r#"Refactor the following code to follow best practices and improve readability, performance and security, and fix any bugs you find.

{code}

Requirements:
- Preserve the functional behaviour of the code.
- Keep existing comments unless they become wrong.
- Return the complete refactored code, not a diff or an excerpt.

Respond with a JSON object of exactly this shape:
{{
  "refactored": "the complete refactored code",
  "changes": [
    {{ "type": "readability", "description": "what changed and why" }}
  ],
  "summary": "a short summary of the refactor"
}}

"type" must be one of {types}."#,
        code = fenced(code, language),
        types = quoted_list(&ChangeType::ALL),
    );

    vec![ChatMessage::system(REFACTOR_SYSTEM), ChatMessage::user(prompt)]
}
