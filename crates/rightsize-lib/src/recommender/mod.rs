//! Scale-down recommendations
//!
//! This module provides:
//! - `ScaleDownRecommender`, a single parameterized engine over a target band
//! - Batch sizing with per-item isolation, sequential or on tokio tasks
//! - `BatchSummary` aggregates for reports

mod batch;
mod config;
mod engine;

pub use batch::BatchSummary;
pub use config::{RecommenderConfig, DEFAULT_TARGET_HIGH, DEFAULT_TARGET_LOW, HOURS_PER_MONTH};
pub use engine::{ScaleDownRecommender, Screened};
