//! Service layer for the Codiny server.
//!
//! Stateful operations that sit behind the HTTP handlers.

pub mod results;

pub use results::ResultService;
