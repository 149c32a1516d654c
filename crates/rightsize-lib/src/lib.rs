//! Instance rightsizing library
//!
//! This crate provides the core functionality for:
//! - Parsing instance types and walking the size ladder
//! - Scale-down recommendations against a target utilization band
//! - Price lookup, caching, alternatives and savings estimates
//! - Reading inventory reports into batch items
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod pricing;
pub mod recommender;
pub mod sizing;

pub use error::{ConfigError, InventoryError, ParseError, PriceTableError, SavingsError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{RecommenderMetrics, StructuredLogger};
pub use pricing::{PriceCache, PriceLookup, StaticPriceTable};
pub use recommender::{BatchSummary, RecommenderConfig, ScaleDownRecommender};
