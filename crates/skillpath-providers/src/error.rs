//! Provider error types.
//!
//! The error enum lives in `skillpath-core` so the roadmap generator can
//! classify failures; it is re-exported here for provider implementations.

pub use skillpath_core::error::GenerationError;
