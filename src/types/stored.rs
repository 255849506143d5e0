//! Saved analysis types.
//!
//! These describe results the dashboard chose to keep, keyed by
//! repository, file path and user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::refactor::RefactorResult;
use super::review::ReviewResult;

/// Kind of a saved analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Review,
    Refactor,
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisKind::Review => write!(f, "review"),
            AnalysisKind::Refactor => write!(f, "refactor"),
        }
    }
}

/// A review or refactor result, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "lowercase")]
pub enum AnalysisResult {
    Review(ReviewResult),
    Refactor(RefactorResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Review(_) => AnalysisKind::Review,
            AnalysisResult::Refactor(_) => AnalysisKind::Refactor,
        }
    }
}

/// Body of `POST /results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// File path inside the repository
    pub path: String,
    /// Id of the user who requested the analysis
    pub user_id: String,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl SaveRequest {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
        user_id: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            path: path.into(),
            user_id: user_id.into(),
            analysis,
        }
    }
}

/// A stored analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnalysis {
    /// Content hash of the entry
    pub id: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub user_id: String,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    /// When the entry was first saved
    pub created_at: DateTime<Utc>,
}

/// Per-repository counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub owner: String,
    pub repo: String,
    pub review_count: u64,
    pub refactor_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

/// Sort order for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Path,
}

/// Filters for listing saved analyses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultQuery {
    #[serde(default)]
    pub kind: Option<AnalysisKind>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Change, ChangeType};
    use serde_json::json;

    #[test]
    fn test_save_request_flattened_kind() {
        let body = json!({
            "owner": "octocat",
            "repo": "hello-world",
            "path": "src/app.ts",
            "userId": "u1",
            "kind": "refactor",
            "result": {
                "refactored": "const a = 1;",
                "changes": [{ "type": "readability", "description": "const" }],
                "summary": "use const"
            }
        });

        let req: SaveRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.analysis.kind(), AnalysisKind::Refactor);
        match req.analysis {
            AnalysisResult::Refactor(r) => {
                assert_eq!(
                    r.changes,
                    vec![Change {
                        change_type: ChangeType::Readability,
                        description: "const".to_string()
                    }]
                );
            }
            _ => panic!("Expected refactor"),
        }
    }

    #[test]
    fn test_saved_analysis_serialization() {
        let saved = SavedAnalysis {
            id: "abc".to_string(),
            owner: "octocat".to_string(),
            repo: "hello-world".to_string(),
            path: "main.rs".to_string(),
            user_id: "u1".to_string(),
            analysis: AnalysisResult::Review(ReviewResult {
                summary: "fine".to_string(),
                issues: vec![],
                score: 90,
            }),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["kind"], json!("review"));
        assert_eq!(value["result"]["score"], json!(90));
        assert_eq!(value["userId"], json!("u1"));

        let parsed: SavedAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, saved);
    }

    #[test]
    fn test_query_defaults() {
        let query: ResultQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.sort, SortOrder::Newest);
        assert!(query.kind.is_none());
        assert!(query.limit.is_none());
    }
}
