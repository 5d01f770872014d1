//! Pipelines.
//!
//! Pipelines wire readers, filters and writers together.
//! The module provides a light [pipeline::Pipeline] trait that enables easy and flexible pipeline creation.
pub mod corpus;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use corpus::{BuildCorpus, CrawlCorpus};
pub use pipeline::Pipeline;
