//! Saved analysis results.
//!
//! Results are keyed by a content hash, so saving the same result for the
//! same repository, path and user twice is a no-op. The whole store lives
//! in one JSON document under the data directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analysis::validate;
use crate::error::{Error, Result};
use crate::types::{
    AnalysisKind, RepositoryStats, ResultQuery, SaveRequest, SavedAnalysis, SortOrder,
};

/// Counters for one repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RepositoryCounters {
    review_count: u64,
    refactor_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_analyzed_at: Option<DateTime<Utc>>,
}

/// On-disk document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ResultStore {
    entries: HashMap<String, SavedAnalysis>,
    repositories: HashMap<String, RepositoryCounters>,
}

/// Repository names are case-insensitive on GitHub.
fn repo_key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner.to_lowercase(), repo.to_lowercase())
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

/// Content hash identifying a saved result.
fn content_id(request: &SaveRequest) -> Result<String> {
    let mut hasher = Sha256::new();
    for part in [
        request.analysis.kind().to_string(),
        repo_key(&request.owner, &request.repo),
        request.path.clone(),
        request.user_id.clone(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(serde_json::to_vec(&request.analysis)?);
    Ok(hex::encode(hasher.finalize()))
}

/// Service for saving and listing analysis results.
pub struct ResultService {
    store: Arc<RwLock<ResultStore>>,
    storage_path: PathBuf,
}

impl ResultService {
    /// Open (or create) the store under `data_dir`.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let storage_path = data_dir.join("results.json");

        // Create directory if needed
        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let store = if storage_path.exists() {
            let content = fs::read_to_string(&storage_path).await?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = ?storage_path, error = %e, "Ignoring unreadable results file");
                ResultStore::default()
            })
        } else {
            ResultStore::default()
        };

        info!(
            path = ?storage_path,
            entries = store.entries.len(),
            "Result store opened"
        );

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            storage_path,
        })
    }

    /// Write a document to disk.
    async fn persist(&self, store: &ResultStore) -> Result<()> {
        let content = serde_json::to_string_pretty(store)?;
        fs::write(&self.storage_path, content).await?;
        Ok(())
    }

    /// Save a result. Returns the entry and whether it was newly created.
    ///
    /// The in-memory store only changes once the new document is on disk.
    pub async fn save_result(&self, request: SaveRequest) -> Result<(SavedAnalysis, bool)> {
        require("owner", &request.owner)?;
        require("repo", &request.repo)?;
        require("path", &request.path)?;
        require("userId", &request.user_id)?;
        validate::check_submitted(&request.analysis)?;

        let id = content_id(&request)?;
        let key = repo_key(&request.owner, &request.repo);

        let mut store = self.store.write().await;
        if let Some(existing) = store.entries.get(&id) {
            return Ok((existing.clone(), false));
        }

        let now = Utc::now();
        let entry = SavedAnalysis {
            id: id.clone(),
            owner: request.owner,
            repo: request.repo,
            path: request.path,
            user_id: request.user_id,
            analysis: request.analysis,
            created_at: now,
        };

        let mut next = store.clone();
        let counters = next.repositories.entry(key).or_default();
        match entry.analysis.kind() {
            AnalysisKind::Review => counters.review_count += 1,
            AnalysisKind::Refactor => counters.refactor_count += 1,
        }
        counters.last_analyzed_at = Some(now);
        next.entries.insert(id, entry.clone());

        self.persist(&next).await?;
        *store = next;
        drop(store);

        info!(
            id = %entry.id,
            kind = %entry.analysis.kind(),
            repo = %format!("{}/{}", entry.owner, entry.repo),
            path = %entry.path,
            "Saved analysis result"
        );

        Ok((entry, true))
    }

    /// Look up a saved result by id.
    pub async fn get(&self, id: &str) -> Result<SavedAnalysis> {
        let store = self.store.read().await;
        store
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("analysis result {}", id)))
    }

    /// List a repository's results.
    pub async fn list(&self, owner: &str, repo: &str, query: &ResultQuery) -> Vec<SavedAnalysis> {
        let key = repo_key(owner, repo);
        let store = self.store.read().await;

        let mut results: Vec<SavedAnalysis> = store
            .entries
            .values()
            .filter(|e| repo_key(&e.owner, &e.repo) == key)
            .filter(|e| query.kind.is_none_or(|k| e.analysis.kind() == k))
            .filter(|e| query.path.as_ref().is_none_or(|p| &e.path == p))
            .filter(|e| query.user_id.as_ref().is_none_or(|u| &e.user_id == u))
            .cloned()
            .collect();

        // Ties broken by id so listings are stable.
        match query.sort {
            SortOrder::Newest => {
                results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)))
            }
            SortOrder::Oldest => {
                results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            }
            SortOrder::Path => results.sort_by(|a, b| {
                a.path
                    .cmp(&b.path)
                    .then(b.created_at.cmp(&a.created_at))
                    .then(a.id.cmp(&b.id))
            }),
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        results
    }

    /// Counters for a repository; zeroes when nothing was saved.
    pub async fn stats(&self, owner: &str, repo: &str) -> RepositoryStats {
        let store = self.store.read().await;
        let counters = store
            .repositories
            .get(&repo_key(owner, repo))
            .cloned()
            .unwrap_or_default();

        RepositoryStats {
            owner: owner.to_string(),
            repo: repo.to_string(),
            review_count: counters.review_count,
            refactor_count: counters.refactor_count,
            last_analyzed_at: counters.last_analyzed_at,
        }
    }

    /// Remove a repository's results and counters.
    pub async fn delete_repository(&self, owner: &str, repo: &str) -> Result<usize> {
        let key = repo_key(owner, repo);

        let mut store = self.store.write().await;
        let mut next = store.clone();
        next.entries.retain(|_, e| repo_key(&e.owner, &e.repo) != key);
        let had_counters = next.repositories.remove(&key).is_some();
        let removed = store.entries.len() - next.entries.len();
        if removed == 0 && !had_counters {
            return Ok(0);
        }

        self.persist(&next).await?;
        *store = next;
        drop(store);

        info!(repo = %key, removed, "Deleted repository results");
        Ok(removed)
    }
}
