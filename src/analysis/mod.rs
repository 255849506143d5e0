//! AI review and refactor pipeline.
//!
//! Each request is one linear pass: build the prompt, call the completion
//! service once, validate the answer. Nothing is retried or cached.

pub mod language;
pub mod prompts;
pub mod validate;

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::llm::CompletionService;
use crate::metrics::{Metrics, Timer};
use crate::types::{AnalysisKind, AnalysisRequest, RefactorResult, ReviewResult};

/// Review and refactor operations over an injected completion backend.
#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn CompletionService>,
    metrics: Arc<Metrics>,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(backend: Arc<dyn CompletionService>, metrics: Arc<Metrics>) -> Self {
        Self { backend, metrics }
    }

    fn require_code(request: &AnalysisRequest, kind: AnalysisKind) -> Result<&str> {
        request.code().ok_or_else(|| {
            let message = match kind {
                AnalysisKind::Review => "No code provided for review",
                AnalysisKind::Refactor => "No code provided for refactoring",
            };
            Error::InvalidInput(message.to_string())
        })
    }

    fn record_outcome<T>(&self, kind: AnalysisKind, result: &Result<T>, timer: &Timer) {
        match result {
            Ok(_) => info!(%kind, elapsed_ms = timer.elapsed_ms(), "Analysis completed"),
            Err(e) => {
                if e.is_upstream_transport() {
                    self.metrics.inc_upstream_failures();
                } else if e.is_upstream_shape() {
                    self.metrics.inc_shape_failures();
                }
                warn!(%kind, elapsed_ms = timer.elapsed_ms(), error = %e, "Analysis failed");
            }
        }
    }

    /// Review a snippet.
    pub async fn review(&self, request: &AnalysisRequest) -> Result<ReviewResult> {
        let code = Self::require_code(request, AnalysisKind::Review)?;
        let language =
            language::fence_language(request.language.as_deref(), request.filename.as_deref());
        self.metrics.inc_reviews();

        let timer = Timer::start();
        debug!(bytes = code.len(), language = ?language, "Requesting review");

        let messages = prompts::review_messages(code, language.as_deref());
        let result = match self.backend.complete_json(messages).await {
            Ok(text) => validate::parse_review(&text),
            Err(e) => Err(e),
        };

        self.record_outcome(AnalysisKind::Review, &result, &timer);
        result
    }

    /// Refactor a snippet.
    pub async fn refactor(&self, request: &AnalysisRequest) -> Result<RefactorResult> {
        let code = Self::require_code(request, AnalysisKind::Refactor)?;
        let language =
            language::fence_language(request.language.as_deref(), request.filename.as_deref());
        self.metrics.inc_refactors();

        let timer = Timer::start();
        debug!(bytes = code.len(), language = ?language, "Requesting refactor");

        let messages = prompts::refactor_messages(code, language.as_deref());
        let result = match self.backend.complete_json(messages).await {
            Ok(text) => validate::parse_refactor(&text),
            Err(e) => Err(e),
        };

        self.record_outcome(AnalysisKind::Refactor, &result, &timer);
        result
    }
}
