//! Memoizing price cache
//!
//! Owned by the caller, typically one per batch run. Both hits and misses are
//! remembered so an unknown type is only looked up once.

use super::PriceLookup;
use crate::models::Service;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Cache key: (instance type, region, service)
pub type PriceKey = (String, String, Service);

/// Wraps a `PriceLookup` and memoizes its answers
pub struct PriceCache<L> {
    inner: L,
    entries: DashMap<PriceKey, Option<f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl<L: PriceLookup> PriceCache<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Drop all memoized prices
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

#[async_trait]
impl<L: PriceLookup> PriceLookup for PriceCache<L> {
    async fn hourly_price(
        &self,
        instance_type: &str,
        region: &str,
        service: Service,
    ) -> Option<f64> {
        let key = (instance_type.to_string(), region.to_string(), service);

        let cached = self.entries.get(&key).map(|entry| *entry.value());
        if let Some(price) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return price;
        }

        let price = self.inner.hourly_price(instance_type, region, service).await;
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(instance_type, region, %service, ?price, "Price cache miss");
        self.entries.insert(key, price);
        price
    }
}
