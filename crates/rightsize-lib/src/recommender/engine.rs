//! Scale-down recommendation engine
//!
//! Walks the size ladder downward from the current size, predicting CPU
//! utilization on each smaller size with a linear capacity model:
//!
//! ```text
//! predicted = utilization * current_multiplier / candidate_multiplier
//! ```
//!
//! The walk keeps the smallest cheaper candidate whose prediction stays at or
//! below the upper band bound and stops as soon as a prediction reaches the
//! lower bound.

use super::config::RecommenderConfig;
use crate::error::ConfigError;
use crate::models::{Outcome, ReasonCode, Recommendation, RecommendationNote, Service};
use crate::pricing::{usable_price, PriceLookup};
use crate::sizing::{floor_for, parse, InstanceType, SizeTier};
use tracing::{debug, trace};

/// Instance that passed the lookup-free checks and needs a priced search
#[derive(Debug, Clone, PartialEq)]
pub struct Screened {
    pub utilization: f64,
    pub instance: InstanceType,
    pub floor: SizeTier,
}

/// Recommends smaller, cheaper instance types for over-provisioned instances
#[derive(Debug, Clone, Default)]
pub struct ScaleDownRecommender {
    config: RecommenderConfig,
}

impl ScaleDownRecommender {
    pub fn new(config: RecommenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Checks that need no price data: utilization, type shape and floor
    ///
    /// Returns the reason when the instance can be decided without pricing.
    pub fn screen(
        &self,
        instance_type: &str,
        utilization_pct: Option<f64>,
        service: Service,
    ) -> Result<Screened, ReasonCode> {
        let utilization = match utilization_pct {
            Some(value) if value.is_finite() && value >= 0.0 => value,
            _ => return Err(ReasonCode::UtilizationUnavailable),
        };

        if utilization >= self.config.target_low {
            return Err(if utilization <= self.config.target_high {
                ReasonCode::Adequate
            } else {
                ReasonCode::UnderProvisioned
            });
        }

        let instance = parse(instance_type).map_err(|e| {
            debug!(error = %e, "Cannot size instance type");
            e.reason()
        })?;

        let floor = floor_for(&instance.family, service);
        if instance.size <= floor {
            return Err(ReasonCode::MinimumConfiguration);
        }

        Ok(Screened {
            utilization,
            instance,
            floor,
        })
    }

    /// Size a single instance
    pub async fn recommend(
        &self,
        instance_type: &str,
        utilization_pct: Option<f64>,
        service: Service,
        region: &str,
        lookup: &dyn PriceLookup,
    ) -> Outcome {
        match self.screen(instance_type, utilization_pct, service) {
            Ok(screened) => {
                self.search(instance_type, &screened, service, region, lookup)
                    .await
            }
            Err(reason) => Outcome::none(reason),
        }
    }

    /// Priced ladder walk for a screened instance
    pub async fn search(
        &self,
        instance_type: &str,
        screened: &Screened,
        service: Service,
        region: &str,
        lookup: &dyn PriceLookup,
    ) -> Outcome {
        let Some(current_price) =
            usable_price(lookup.hourly_price(instance_type, region, service).await)
        else {
            return Outcome::none(ReasonCode::PriceUnavailable);
        };

        let current_multiplier = screened.instance.size.multiplier();
        let mut best: Option<Recommendation> = None;

        for candidate in screened.instance.size.descending_to(screened.floor) {
            let predicted = screened.utilization * (current_multiplier / candidate.multiplier());
            if predicted > self.config.target_high {
                trace!(%candidate, predicted, "Candidate would exceed target band");
                break;
            }

            let candidate_type = screened.instance.with_size(candidate);
            let Some(candidate_price) =
                usable_price(lookup.hourly_price(&candidate_type, region, service).await)
            else {
                trace!(candidate_type = %candidate_type, "No price for candidate, skipping");
                continue;
            };

            if candidate_price >= current_price {
                trace!(candidate_type = %candidate_type, candidate_price, current_price, "Candidate is not cheaper");
                continue;
            }

            best = Some(self.build(candidate_type, predicted, current_price, candidate_price));
            if predicted >= self.config.target_low {
                break;
            }
        }

        match best {
            Some(recommendation) => {
                let note = if recommendation.predicted_utilization >= self.config.target_low {
                    RecommendationNote::Recommended
                } else {
                    RecommendationNote::MoreSavingsPossible
                };
                debug!(
                    instance_type,
                    recommended_type = %recommendation.recommended_type,
                    predicted_utilization = recommendation.predicted_utilization,
                    "Found smaller instance type"
                );
                Outcome::Recommended {
                    recommendation,
                    note,
                }
            }
            None => Outcome::none(ReasonCode::NoSafeCandidate),
        }
    }

    fn build(
        &self,
        recommended_type: String,
        predicted_utilization: f64,
        current_price: f64,
        recommended_price: f64,
    ) -> Recommendation {
        let hourly_savings = current_price - recommended_price;
        Recommendation {
            recommended_type,
            predicted_utilization,
            current_price,
            recommended_price,
            hourly_savings,
            monthly_savings: hourly_savings * self.config.hours_per_month,
            savings_percent: (1.0 - recommended_price / current_price) * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::StaticPriceTable;

    const REGION: &str = "ap-northeast-1";

    fn t3a_prices() -> StaticPriceTable {
        let mut table = StaticPriceTable::empty();
        for (size, price) in [
            ("large", 0.0752),
            ("medium", 0.0376),
            ("small", 0.0188),
            ("micro", 0.0094),
            ("nano", 0.0047),
        ] {
            table.insert(Service::Ec2, format!("t3a.{size}"), price);
        }
        table
    }

    async fn recommend(
        instance_type: &str,
        utilization: Option<f64>,
        service: Service,
        prices: &StaticPriceTable,
    ) -> Outcome {
        ScaleDownRecommender::default()
            .recommend(instance_type, utilization, service, REGION, prices)
            .await
    }

    #[tokio::test]
    async fn test_walk_stops_at_first_candidate_in_band() {
        let outcome = recommend("t3a.large", Some(10.0), Service::Ec2, &t3a_prices()).await;

        let Outcome::Recommended {
            recommendation,
            note,
        } = outcome
        else {
            panic!("expected a recommendation, got {outcome:?}");
        };
        assert_eq!(recommendation.recommended_type, "t3a.small");
        assert_eq!(recommendation.predicted_utilization, 40.0);
        assert_eq!(note, RecommendationNote::Recommended);
        assert_eq!(recommendation.current_price, 0.0752);
        assert_eq!(recommendation.recommended_price, 0.0188);
        assert!((recommendation.hourly_savings - 0.0564).abs() < 1e-12);
        assert!((recommendation.monthly_savings - 0.0564 * 730.0).abs() < 1e-9);
        assert!((recommendation.savings_percent - 75.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fixed_family_at_floor_is_minimum_configuration() {
        let prices = StaticPriceTable::empty();
        let outcome = recommend("db.r5.large", Some(15.0), Service::Rds, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::MinimumConfiguration));
    }

    #[tokio::test]
    async fn test_utilization_in_band_is_adequate() {
        let prices = StaticPriceTable::builtin();
        let outcome = recommend("cache.t3.medium", Some(55.0), Service::Elasticache, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::Adequate));
    }

    #[tokio::test]
    async fn test_utilization_above_band_is_under_provisioned() {
        let prices = StaticPriceTable::builtin();
        let outcome = recommend("t3.medium", Some(85.0), Service::Ec2, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::UnderProvisioned));
    }

    #[tokio::test]
    async fn test_band_boundaries_are_inclusive() {
        let prices = StaticPriceTable::builtin();
        assert_eq!(
            recommend("t3.large", Some(40.0), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::Adequate)
        );
        assert_eq!(
            recommend("t3.large", Some(70.0), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::Adequate)
        );
        assert_eq!(
            recommend("t3.large", Some(70.01), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::UnderProvisioned)
        );
    }

    #[tokio::test]
    async fn test_unpriced_candidates_are_skipped() {
        let mut prices = StaticPriceTable::empty();
        prices.insert(Service::Ec2, "m5.xlarge", 0.192);

        let outcome = recommend("m5.xlarge", Some(5.0), Service::Ec2, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::NoSafeCandidate));
    }

    #[tokio::test]
    async fn test_skipped_candidate_does_not_abort_walk() {
        let mut prices = StaticPriceTable::empty();
        prices.insert(Service::Ec2, "t3a.large", 0.0752);
        prices.insert(Service::Ec2, "t3a.small", 0.0188);
        prices.insert(Service::Ec2, "t3a.nano", 0.0047);

        let outcome = recommend("t3a.large", Some(10.0), Service::Ec2, &prices).await;
        assert_eq!(
            outcome.recommendation().map(|r| r.recommended_type.as_str()),
            Some("t3a.small")
        );
    }

    #[tokio::test]
    async fn test_malformed_types_report_distinct_reasons() {
        let prices = StaticPriceTable::builtin();
        assert_eq!(
            recommend("xyz", Some(10.0), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::UnparseableSize)
        );
        assert_eq!(
            recommend("m5.metal", Some(10.0), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::UnknownSizeMultiplier)
        );
    }

    #[tokio::test]
    async fn test_missing_or_invalid_utilization() {
        let prices = StaticPriceTable::builtin();
        for utilization in [None, Some(f64::NAN), Some(-3.0), Some(f64::INFINITY)] {
            assert_eq!(
                recommend("t3.large", utilization, Service::Ec2, &prices).await,
                Outcome::none(ReasonCode::UtilizationUnavailable)
            );
        }
    }

    #[tokio::test]
    async fn test_missing_current_price() {
        let prices = StaticPriceTable::empty();
        assert_eq!(
            recommend("t3.large", Some(10.0), Service::Ec2, &prices).await,
            Outcome::none(ReasonCode::PriceUnavailable)
        );
    }

    #[tokio::test]
    async fn test_zero_utilization_walks_to_floor() {
        let outcome = recommend("t3a.large", Some(0.0), Service::Ec2, &t3a_prices()).await;

        let Outcome::Recommended {
            recommendation,
            note,
        } = outcome
        else {
            panic!("expected a recommendation, got {outcome:?}");
        };
        assert_eq!(recommendation.recommended_type, "t3a.nano");
        assert_eq!(recommendation.predicted_utilization, 0.0);
        assert_eq!(note, RecommendationNote::MoreSavingsPossible);
    }

    #[tokio::test]
    async fn test_walk_aborts_before_exceeding_band() {
        // 30% on 2xlarge: xlarge predicts 60 (accepted, stop)
        let mut prices = StaticPriceTable::empty();
        prices.insert(Service::Ec2, "m5.2xlarge", 0.384);
        prices.insert(Service::Ec2, "m5.xlarge", 0.192);
        prices.insert(Service::Ec2, "m5.large", 0.096);
        let outcome = recommend("m5.2xlarge", Some(30.0), Service::Ec2, &prices).await;
        assert_eq!(
            outcome.recommendation().map(|r| r.recommended_type.as_str()),
            Some("m5.xlarge")
        );

        // 38% on 2xlarge: xlarge would predict 76, so large is never tried
        prices = StaticPriceTable::empty();
        prices.insert(Service::Ec2, "m5.2xlarge", 0.384);
        prices.insert(Service::Ec2, "m5.large", 0.096);
        let outcome = recommend("m5.2xlarge", Some(38.0), Service::Ec2, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::NoSafeCandidate));
    }

    #[tokio::test]
    async fn test_more_expensive_candidates_rejected() {
        let mut prices = StaticPriceTable::empty();
        prices.insert(Service::Ec2, "c5.xlarge", 0.17);
        prices.insert(Service::Ec2, "c5.large", 0.2);
        let outcome = recommend("c5.xlarge", Some(10.0), Service::Ec2, &prices).await;
        assert_eq!(outcome, Outcome::none(ReasonCode::NoSafeCandidate));
    }

    #[tokio::test]
    async fn test_burstable_rds_floor_stops_at_medium() {
        let prices = StaticPriceTable::builtin();
        let outcome = recommend("db.t3.large", Some(5.0), Service::Rds, &prices).await;

        let rec = outcome.recommendation().expect("recommendation");
        assert_eq!(rec.recommended_type, "db.t3.medium");
        assert_eq!(rec.predicted_utilization, 10.0);

        assert_eq!(
            recommend("db.t3.medium", Some(5.0), Service::Rds, &prices).await,
            Outcome::none(ReasonCode::MinimumConfiguration)
        );
    }

    #[tokio::test]
    async fn test_custom_band() {
        let config = RecommenderConfig::default().with_band(30.0, 60.0);
        let recommender = ScaleDownRecommender::new(config).unwrap();

        let outcome = recommender
            .recommend("t3a.large", Some(35.0), Service::Ec2, REGION, &t3a_prices())
            .await;
        assert_eq!(outcome, Outcome::none(ReasonCode::Adequate));

        let outcome = recommender
            .recommend("t3a.large", Some(20.0), Service::Ec2, REGION, &t3a_prices())
            .await;
        assert_eq!(
            outcome.recommendation().map(|r| r.recommended_type.as_str()),
            Some("t3a.medium")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RecommenderConfig::default().with_band(70.0, 40.0);
        assert!(ScaleDownRecommender::new(config).is_err());
    }

    #[test]
    fn test_screen_needs_no_prices() {
        let recommender = ScaleDownRecommender::default();
        let screened = recommender
            .screen("r5.4xlarge", Some(12.0), Service::Ec2)
            .unwrap();
        assert_eq!(screened.instance.size, SizeTier::X4Large);
        assert_eq!(screened.floor, SizeTier::Large);

        assert_eq!(
            recommender.screen("cache.t3.micro", Some(1.0), Service::Elasticache),
            Err(ReasonCode::MinimumConfiguration)
        );
    }

    #[test]
    fn test_idempotent_outcomes() {
        let prices = StaticPriceTable::builtin();
        let recommender = ScaleDownRecommender::default();
        let run = || {
            tokio_test::block_on(recommender.recommend(
                "t3.large",
                Some(12.5),
                Service::Ec2,
                REGION,
                &prices,
            ))
        };
        assert_eq!(run(), run());
    }
}
