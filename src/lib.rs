//! Codiny Server
//!
//! Backend for the Codiny dashboard: AI-generated code reviews and
//! refactors for a selected file, team invitations by e-mail, and an
//! optional store for the results the dashboard decides to keep.
//!
//! # Architecture
//!
//! 1. **LLM Layer** (`llm`) - client for an OpenAI-compatible completion API
//! 2. **Analysis Layer** (`analysis`) - prompt construction and two-stage
//!    validation of the model's JSON answer
//! 3. **Mail Layer** (`mail`) - invitation rendering and SMTP delivery
//! 4. **Service Layer** (`service`) - saved results with per-repository counters
//! 5. **HTTP Layer** (`http`) - axum router exposing all of the above
//!
//! The completion client is built once at startup and injected into the
//! analysis service; handlers share no mutable state besides the result
//! store.

pub mod analysis;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod mail;
pub mod metrics;
pub mod service;
pub mod types;

pub use error::{Error, Result};

/// Server version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted request body (5MB).
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;
