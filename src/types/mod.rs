//! Core type definitions for the Codiny server.
//!
//! Shared request/response types, organized by domain.

pub mod invitation;
pub mod refactor;
pub mod review;
pub mod stored;

// Re-export commonly used types
pub use invitation::*;
pub use refactor::*;
pub use review::*;
pub use stored::*;
