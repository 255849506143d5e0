//! Code review types.
//!
//! A review is a structured quality assessment of a single snippet:
//! a summary, an ordered list of issues and an overall score.

use serde::{Deserialize, Serialize};

/// Request body shared by the review and refactor endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Source code to analyze
    #[serde(default)]
    pub code: Option<String>,
    /// Optional language hint (e.g. "rust", "ts")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Optional file name, used to infer the language when no hint is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AnalysisRequest {
    /// Create a request for a bare snippet.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    /// The snippet, if present and not blank.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// A completed code review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Short overall assessment
    pub summary: String,
    /// Issues in the order the model reported them
    pub issues: Vec<Issue>,
    /// Quality score (0-100)
    pub score: u8,
}

/// A single review issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Source line (1-based; 0 when the issue is file-wide)
    pub line: u32,
    /// Description of the problem
    pub message: String,
}

/// Category of a review issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Error,
    Warning,
    Improvement,
    BestPractice,
}

impl IssueType {
    /// All accepted values, in prompt order.
    pub const ALL: [IssueType; 4] = [
        IssueType::Error,
        IssueType::Warning,
        IssueType::Improvement,
        IssueType::BestPractice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Error => "error",
            IssueType::Warning => "warning",
            IssueType::Improvement => "improvement",
            IssueType::BestPractice => "best-practice",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
