//! Price lookup for instance types
//!
//! This module provides:
//! - The `PriceLookup` capability consumed by the recommender
//! - A caller-owned memoizing cache keyed by (type, region, service)
//! - A static on-demand price table with JSON file overrides
//! - Cross-family alternatives and savings calculations

mod alternatives;
mod cache;
mod savings;
mod table;

pub use alternatives::{cheaper_alternatives, find_alternatives, Alternative, AlternativesReport};
pub use cache::{CacheStats, PriceCache, PriceKey};
pub use savings::{calculate_savings, SavingsEstimate};
pub use table::StaticPriceTable;

use crate::models::Service;
use std::sync::Arc;

pub use async_trait::async_trait;

/// Hourly on-demand price source, in USD
///
/// Returns `None` when the price is unknown. Lookups are expected to be
/// idempotent; retries and timeouts belong to the implementation.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn hourly_price(&self, instance_type: &str, region: &str, service: Service)
        -> Option<f64>;
}

#[async_trait]
impl<T: PriceLookup + ?Sized> PriceLookup for Arc<T> {
    async fn hourly_price(
        &self,
        instance_type: &str,
        region: &str,
        service: Service,
    ) -> Option<f64> {
        (**self).hourly_price(instance_type, region, service).await
    }
}

#[async_trait]
impl<T: PriceLookup + ?Sized> PriceLookup for &T {
    async fn hourly_price(
        &self,
        instance_type: &str,
        region: &str,
        service: Service,
    ) -> Option<f64> {
        (**self).hourly_price(instance_type, region, service).await
    }
}

/// Tries `primary` first and falls back to `fallback` on a miss
pub struct ChainedLookup<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> ChainedLookup<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: PriceLookup, F: PriceLookup> PriceLookup for ChainedLookup<P, F> {
    async fn hourly_price(
        &self,
        instance_type: &str,
        region: &str,
        service: Service,
    ) -> Option<f64> {
        match usable_price(self.primary.hourly_price(instance_type, region, service).await) {
            Some(price) => Some(price),
            None => self.fallback.hourly_price(instance_type, region, service).await,
        }
    }
}

/// Treat zero, negative and non-finite prices as unknown
pub fn usable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}
