//! Two-stage validation of completion output.
//!
//! Stage one parses the raw text as JSON. Stage two checks the top-level
//! shape and converts it into a typed result. Content rules:
//! `type` fields must be known enum values, `line` must be a non-negative
//! integer, and `score` is clamped into 0..=100.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{
    AnalysisResult, Change, ChangeType, Issue, IssueType, RefactorResult, ReviewResult,
};

/// Parse the completion text as JSON.
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::ResponseParse(e.to_string()))
}

fn shape(message: impl Into<String>) -> Error {
    Error::ResponseShape(message.into())
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| shape(format!("{} is not an object", what)))
}

fn string_field(obj: &Map<String, Value>, key: &str, what: &str) -> Result<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| shape(format!("{} is missing string field `{}`", what, key)))
}

fn non_empty_string_field(obj: &Map<String, Value>, key: &str, what: &str) -> Result<String> {
    let value = string_field(obj, key, what)?;
    if value.is_empty() {
        return Err(shape(format!("{} has empty field `{}`", what, key)));
    }
    Ok(value)
}

fn array_field<'a>(obj: &'a Map<String, Value>, key: &str, what: &str) -> Result<&'a Vec<Value>> {
    obj.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| shape(format!("{} is missing array field `{}`", what, key)))
}

fn enum_field<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
    what: &str,
) -> Result<T> {
    let raw = obj
        .get(key)
        .ok_or_else(|| shape(format!("{} is missing field `{}`", what, key)))?;
    serde_json::from_value(raw.clone())
        .map_err(|_| shape(format!("{} has unknown {} {}", what, key, raw)))
}

/// Accepts integers and integral floats (`12.0`); rejects negatives.
fn line_number(value: Option<&Value>, what: &str) -> Result<u32> {
    let number = value
        .and_then(Value::as_f64)
        .ok_or_else(|| shape(format!("{} is missing numeric field `line`", what)))?;
    if number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
        return Err(shape(format!("{} has invalid line {}", what, number)));
    }
    Ok(number as u32)
}

/// Round and clamp a score into 0..=100.
fn score(value: Option<&Value>) -> Result<u8> {
    let raw = value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| shape("response is missing numeric field `score`"))?;

    let clamped = raw.round().clamp(0.0, 100.0);
    if clamped != raw {
        warn!(score = raw, normalized = clamped, "Normalized out-of-range review score");
    }
    Ok(clamped as u8)
}

fn issue(value: &Value, index: usize) -> Result<Issue> {
    let what = format!("issue {}", index);
    let obj = as_object(value, &what)?;
    Ok(Issue {
        issue_type: enum_field::<IssueType>(obj, "type", &what)?,
        line: line_number(obj.get("line"), &what)?,
        message: string_field(obj, "message", &what)?,
    })
}

fn change(value: &Value, index: usize) -> Result<Change> {
    let what = format!("change {}", index);
    let obj = as_object(value, &what)?;
    Ok(Change {
        change_type: enum_field::<ChangeType>(obj, "type", &what)?,
        description: string_field(obj, "description", &what)?,
    })
}

/// Check a parsed review response and convert it to a [`ReviewResult`].
pub fn review_from_value(value: &Value) -> Result<ReviewResult> {
    let obj = as_object(value, "response")?;

    let summary = string_field(obj, "summary", "response")?;
    let issues = array_field(obj, "issues", "response")?;
    let score = score(obj.get("score"))?;

    let issues = issues
        .iter()
        .enumerate()
        .map(|(i, v)| issue(v, i))
        .collect::<Result<Vec<_>>>()?;

    Ok(ReviewResult {
        summary,
        issues,
        score,
    })
}

/// Check a parsed refactor response and convert it to a [`RefactorResult`].
pub fn refactor_from_value(value: &Value) -> Result<RefactorResult> {
    let obj = as_object(value, "response")?;

    let refactored = non_empty_string_field(obj, "refactored", "response")?;
    let changes = array_field(obj, "changes", "response")?;
    let summary = non_empty_string_field(obj, "summary", "response")?;

    let changes = changes
        .iter()
        .enumerate()
        .map(|(i, v)| change(v, i))
        .collect::<Result<Vec<_>>>()?;

    Ok(RefactorResult {
        refactored,
        changes,
        summary,
    })
}

/// Parse and validate review output.
pub fn parse_review(text: &str) -> Result<ReviewResult> {
    review_from_value(&parse_json(text)?)
}

/// Parse and validate refactor output.
pub fn parse_refactor(text: &str) -> Result<RefactorResult> {
    refactor_from_value(&parse_json(text)?)
}

/// Content rules for a result submitted by a client for saving.
///
/// Client input is rejected rather than normalized, so a bad score is an
/// input error here instead of being clamped.
pub fn check_submitted(analysis: &AnalysisResult) -> Result<()> {
    let invalid = |message: &str| Err(Error::InvalidInput(message.to_string()));
    match analysis {
        AnalysisResult::Review(review) => {
            if review.score > 100 {
                return invalid("score must be between 0 and 100");
            }
        }
        AnalysisResult::Refactor(refactor) => {
            if refactor.refactored.is_empty() {
                return invalid("refactored must not be empty");
            }
            if refactor.summary.is_empty() {
                return invalid("summary must not be empty");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_shape_error<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(Error::ResponseShape(_)) => {}
            other => panic!("Expected ResponseShape, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_failure() {
        match parse_review("not json") {
            Err(Error::ResponseParse(_)) => {}
            other => panic!("Expected ResponseParse, got {:?}", other),
        }
        assert!(matches!(parse_refactor(""), Err(Error::ResponseParse(_))));
    }

    #[test]
    fn test_review_valid() {
        let review = parse_review(
            r#"{"summary":"Mostly fine","issues":[{"type":"warning","line":3,"message":"unused import"},{"type":"best-practice","line":7.0,"message":"prefer const"}],"score":82}"#,
        )
        .unwrap();

        assert_eq!(review.summary, "Mostly fine");
        assert_eq!(review.issues.len(), 2);
        assert_eq!(review.issues[0].issue_type, IssueType::Warning);
        assert_eq!(review.issues[1].issue_type, IssueType::BestPractice);
        assert_eq!(review.issues[1].line, 7);
        assert_eq!(review.score, 82);
    }

    #[test]
    fn test_review_missing_fields() {
        assert_shape_error(parse_review(r#"{"summary":"ok"}"#));
        assert_shape_error(parse_review(r#"{"summary":"ok","issues":[]}"#));
        assert_shape_error(parse_review(r#"{"issues":[],"score":50}"#));
        assert_shape_error(parse_review(r#"{"summary":"ok","issues":{},"score":50}"#));
        assert_shape_error(parse_review(r#"{"summary":"ok","issues":[],"score":"50"}"#));
        assert_shape_error(parse_review(r#"[1,2,3]"#));
    }

    #[test]
    fn test_review_empty_summary_allowed() {
        let review = parse_review(r#"{"summary":"","issues":[],"score":100}"#).unwrap();
        assert!(review.summary.is_empty());
        assert!(review.issues.is_empty());
    }

    #[test]
    fn test_review_score_clamped() {
        let high = parse_review(r#"{"summary":"s","issues":[],"score":140}"#).unwrap();
        assert_eq!(high.score, 100);

        let low = parse_review(r#"{"summary":"s","issues":[],"score":-3}"#).unwrap();
        assert_eq!(low.score, 0);

        let fractional = parse_review(r#"{"summary":"s","issues":[],"score":72.6}"#).unwrap();
        assert_eq!(fractional.score, 73);
    }

    #[test]
    fn test_review_issue_content_rules() {
        assert_shape_error(parse_review(
            r#"{"summary":"s","issues":[{"type":"nitpick","line":1,"message":"m"}],"score":5}"#,
        ));
        assert_shape_error(parse_review(
            r#"{"summary":"s","issues":[{"type":"error","line":-1,"message":"m"}],"score":5}"#,
        ));
        assert_shape_error(parse_review(
            r#"{"summary":"s","issues":[{"type":"error","line":2.5,"message":"m"}],"score":5}"#,
        ));
        assert_shape_error(parse_review(
            r#"{"summary":"s","issues":[{"type":"error","line":2}],"score":5}"#,
        ));
        assert_shape_error(parse_review(r#"{"summary":"s","issues":["oops"],"score":5}"#));
    }

    #[test]
    fn test_refactor_valid() {
        let result = parse_refactor(
            r#"{"refactored":"function f() { return 1; }","changes":[{"type":"readability","description":"added spacing"}],"summary":"minor formatting"}"#,
        )
        .unwrap();

        assert_eq!(result.refactored, "function f() { return 1; }");
        assert_eq!(result.changes[0].change_type, ChangeType::Readability);
        assert_eq!(result.changes[0].description, "added spacing");
        assert_eq!(result.summary, "minor formatting");
    }

    #[test]
    fn test_refactor_shape_failures() {
        assert_shape_error(parse_refactor(r#"{"changes":[],"summary":"s"}"#));
        assert_shape_error(parse_refactor(r#"{"refactored":"","changes":[],"summary":"s"}"#));
        assert_shape_error(parse_refactor(r#"{"refactored":"x","changes":"none","summary":"s"}"#));
        assert_shape_error(parse_refactor(r#"{"refactored":"x","changes":[],"summary":""}"#));
        assert_shape_error(parse_refactor(
            r#"{"refactored":"x","changes":[{"type":"style","description":"d"}],"summary":"s"}"#,
        ));
    }

    #[test]
    fn test_refactor_empty_changes_allowed() {
        let result = parse_refactor(r#"{"refactored":"x","changes":[],"summary":"nothing to do"}"#)
            .unwrap();
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_check_submitted() {
        let review = |score| {
            AnalysisResult::Review(ReviewResult {
                summary: "s".to_string(),
                issues: vec![],
                score,
            })
        };
        assert!(check_submitted(&review(100)).is_ok());
        assert!(matches!(
            check_submitted(&review(250)),
            Err(Error::InvalidInput(ref m)) if m == "score must be between 0 and 100"
        ));

        let refactor = |refactored: &str, summary: &str| {
            AnalysisResult::Refactor(RefactorResult {
                refactored: refactored.to_string(),
                changes: vec![],
                summary: summary.to_string(),
            })
        };
        assert!(check_submitted(&refactor("fn f() {}", "tidy")).is_ok());
        assert!(matches!(
            check_submitted(&refactor("", "tidy")),
            Err(Error::InvalidInput(ref m)) if m == "refactored must not be empty"
        ));
        assert!(matches!(
            check_submitted(&refactor("fn f() {}", "")),
            Err(Error::InvalidInput(ref m)) if m == "summary must not be empty"
        ));
    }
}
