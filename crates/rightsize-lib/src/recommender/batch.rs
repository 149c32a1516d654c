//! Batch recommendations
//!
//! Every item is sized independently and results come back in input order.
//! Lookup-free screening happens before any price is requested, and a batch
//! run shares one `PriceCache` so each distinct type is priced once.

use super::engine::ScaleDownRecommender;
use crate::models::{BatchItem, BatchOutcome, Outcome, ReasonCode};
use crate::pricing::{PriceCache, PriceLookup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Aggregate view over a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub recommended: usize,
    pub by_reason: BTreeMap<ReasonCode, usize>,
    /// Sum of monthly savings across recommendations, weighted by item count
    pub total_monthly_savings: f64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Default::default()
        };

        for item in outcomes {
            match &item.outcome {
                Outcome::Recommended { recommendation, .. } => {
                    summary.recommended += 1;
                    summary.total_monthly_savings +=
                        recommendation.monthly_savings * f64::from(item.count);
                }
                Outcome::NoRecommendation { reason } => {
                    *summary.by_reason.entry(*reason).or_insert(0) += 1;
                }
            }
        }

        summary
    }
}

fn tag(item: &BatchItem, outcome: Outcome) -> BatchOutcome {
    BatchOutcome {
        name: item.name.clone(),
        instance_type: item.instance_type.clone(),
        service: item.service,
        count: item.count,
        outcome,
    }
}

impl ScaleDownRecommender {
    /// Size `items` sequentially against a fresh price cache
    pub async fn recommend_batch(
        &self,
        items: &[BatchItem],
        lookup: &dyn PriceLookup,
        region: &str,
    ) -> Vec<BatchOutcome> {
        let cache = PriceCache::new(lookup);
        let outcomes = self.recommend_each(items, &cache, region).await;

        let stats = cache.stats();
        debug!(
            items = items.len(),
            price_hits = stats.hits,
            price_misses = stats.misses,
            "Batch sized"
        );
        outcomes
    }

    /// Size `items` sequentially using `lookup` as given
    ///
    /// Use this to share a caller-owned cache across several runs.
    pub async fn recommend_each(
        &self,
        items: &[BatchItem],
        lookup: &dyn PriceLookup,
        region: &str,
    ) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let outcome = match self.screen(&item.instance_type, item.utilization, item.service) {
                Ok(screened) => {
                    self.search(&item.instance_type, &screened, item.service, region, lookup)
                        .await
                }
                Err(reason) => Outcome::none(reason),
            };
            outcomes.push(tag(item, outcome));
        }
        outcomes
    }

    /// Size `items` on up to `concurrency` tokio tasks sharing one cache
    ///
    /// A task that panics yields `price_unavailable` for its item; the rest
    /// of the batch is unaffected.
    pub async fn recommend_batch_concurrent(
        self: &Arc<Self>,
        items: Vec<BatchItem>,
        lookup: Arc<dyn PriceLookup>,
        region: &str,
        concurrency: usize,
    ) -> Vec<BatchOutcome> {
        let cache = Arc::new(PriceCache::new(lookup));
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut results: Vec<Option<BatchOutcome>> = vec![None; items.len()];
        let mut tasks = JoinSet::new();

        for (index, item) in items.iter().enumerate() {
            match self.screen(&item.instance_type, item.utilization, item.service) {
                Err(reason) => results[index] = Some(tag(item, Outcome::none(reason))),
                Ok(screened) => {
                    let recommender = Arc::clone(self);
                    let cache = Arc::clone(&cache);
                    let permits = Arc::clone(&permits);
                    let region = region.to_string();
                    let item = item.clone();
                    tasks.spawn(async move {
                        let _permit = permits.acquire_owned().await.ok();
                        let outcome = recommender
                            .search(
                                &item.instance_type,
                                &screened,
                                item.service,
                                &region,
                                cache.as_ref(),
                            )
                            .await;
                        (index, tag(&item, outcome))
                    });
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => results[index] = Some(outcome),
                Err(e) => warn!(error = %e, "Batch task failed"),
            }
        }

        results
            .into_iter()
            .zip(items.iter())
            .map(|(result, item)| {
                result.unwrap_or_else(|| tag(item, Outcome::none(ReasonCode::PriceUnavailable)))
            })
            .collect()
    }
}
