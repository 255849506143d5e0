//! Refactoring types.

use serde::{Deserialize, Serialize};

/// A completed refactor: replacement code plus the list of changes made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactorResult {
    /// Full replacement source
    pub refactored: String,
    /// Changes in the order the model reported them
    pub changes: Vec<Change>,
    /// Short description of the refactor
    pub summary: String,
}

/// A single categorized change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub description: String,
}

/// Category of a refactoring change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Performance,
    Readability,
    Structure,
    Security,
    BugFix,
}

impl ChangeType {
    pub const ALL: [ChangeType; 5] = [
        ChangeType::Performance,
        ChangeType::Readability,
        ChangeType::Structure,
        ChangeType::Security,
        ChangeType::BugFix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Performance => "performance",
            ChangeType::Readability => "readability",
            ChangeType::Structure => "structure",
            ChangeType::Security => "security",
            ChangeType::BugFix => "bug-fix",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ChangeType::BugFix).unwrap(),
            "\"bug-fix\""
        );
        let parsed: ChangeType = serde_json::from_str("\"readability\"").unwrap();
        assert_eq!(parsed, ChangeType::Readability);
    }

    #[test]
    fn test_refactor_result_field_order() {
        let result = RefactorResult {
            refactored: "fn f() -> i32 { 1 }".to_string(),
            changes: vec![Change {
                change_type: ChangeType::Structure,
                description: "inlined helper".to_string(),
            }],
            summary: "simplified".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"refactored":"fn f() -> i32 { 1 }","changes":[{"type":"structure","description":"inlined helper"}],"summary":"simplified"}"#
        );
    }
}
