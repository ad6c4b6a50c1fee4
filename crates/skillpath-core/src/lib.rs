//! skillpath-core — Question bank, scoring, classification and roadmaps.
//!
//! This crate defines the data model and the scoring-and-roadmap pipeline
//! that the rest of skillpath builds on.

pub mod bank;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod roadmap;
pub mod scoring;
pub mod store;
pub mod traits;

pub use bank::QuestionBank;
pub use engine::{Submission, SubmissionPipeline};
pub use error::PipelineError;
pub use roadmap::{Roadmap, RoadmapGenerator};
