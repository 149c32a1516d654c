//! Same-size alternatives in other instance families
//!
//! Families are mapped to comparable families ordered roughly from cheapest
//! (Graviton, AMD) to the original Intel family.

use super::{usable_price, PriceLookup};
use crate::models::{round_to, Service};
use crate::sizing::split_instance_type;
use serde::{Deserialize, Serialize};

const FAMILY_ALTERNATIVES: &[(&str, &[&str])] = &[
    ("t3", &["t4g", "t3a", "t3"]),
    ("t3a", &["t4g", "t3a", "t3"]),
    ("t4g", &["t4g", "t3a", "t3"]),
    ("m5", &["m7g", "m6g", "m6a", "m5a", "m5"]),
    ("m5a", &["m7g", "m6g", "m6a", "m5a", "m5"]),
    ("m6i", &["m7g", "m6g", "m6a", "m6i"]),
    ("m6g", &["m7g", "m6g", "m6a", "m6i"]),
    ("c5", &["c7g", "c6g", "c6a", "c5a", "c5"]),
    ("c5a", &["c7g", "c6g", "c6a", "c5a", "c5"]),
    ("c6i", &["c7g", "c6g", "c6a", "c6i"]),
    ("r5", &["r7g", "r6g", "r6a", "r5a", "r5"]),
    ("r5a", &["r7g", "r6g", "r6a", "r5a", "r5"]),
    ("r6i", &["r7g", "r6g", "r6a", "r6i"]),
    ("db.t3", &["db.t4g", "db.t3"]),
    ("db.r5", &["db.r7g", "db.r6g", "db.r5"]),
    ("db.r6g", &["db.r7g", "db.r6g", "db.r5"]),
    ("db.m5", &["db.m7g", "db.m6g", "db.m5"]),
    ("cache.t3", &["cache.t4g", "cache.t3"]),
    ("cache.r5", &["cache.r7g", "cache.r6g", "cache.r5"]),
    ("cache.r6g", &["cache.r7g", "cache.r6g", "cache.r5"]),
    ("cache.m5", &["cache.m7g", "cache.m6g", "cache.m5"]),
];

/// A priced alternative instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub instance_type: String,
    pub hourly_price: f64,
    /// Positive when cheaper than the current type
    pub savings_percent: f64,
}

/// Current price plus priced alternatives, cheapest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesReport {
    pub instance_type: String,
    pub service: Service,
    pub current_price: Option<f64>,
    pub alternatives: Vec<Alternative>,
}

impl AlternativesReport {
    /// Alternatives strictly cheaper than the current type
    pub fn cheaper(&self) -> impl Iterator<Item = &Alternative> {
        self.alternatives.iter().filter(|alt| alt.savings_percent > 0.0)
    }
}

/// Same-size types in comparable families, excluding `instance_type` itself
pub fn find_alternatives(instance_type: &str) -> Vec<String> {
    let Some((family, size)) = split_instance_type(instance_type) else {
        return Vec::new();
    };

    FAMILY_ALTERNATIVES
        .iter()
        .find(|(name, _)| *name == family)
        .map(|(_, families)| {
            families
                .iter()
                .map(|alt| format!("{}.{}", alt, size))
                .filter(|candidate| candidate != instance_type)
                .collect()
        })
        .unwrap_or_default()
}

/// Price the alternatives of `instance_type`
///
/// Alternatives are only reported when the current price is known; those
/// without a price are dropped.
pub async fn cheaper_alternatives(
    instance_type: &str,
    service: Service,
    region: &str,
    lookup: &dyn PriceLookup,
) -> AlternativesReport {
    let current_price = usable_price(lookup.hourly_price(instance_type, region, service).await);

    let mut alternatives = Vec::new();
    if let Some(current) = current_price {
        for candidate in find_alternatives(instance_type) {
            let Some(price) = usable_price(lookup.hourly_price(&candidate, region, service).await)
            else {
                continue;
            };
            alternatives.push(Alternative {
                instance_type: candidate,
                hourly_price: price,
                savings_percent: round_to((current - price) / current * 100.0, 1),
            });
        }
    }

    alternatives.sort_by(|a, b| a.hourly_price.total_cmp(&b.hourly_price));

    AlternativesReport {
        instance_type: instance_type.to_string(),
        service,
        current_price,
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::StaticPriceTable;

    #[test]
    fn test_alternatives_keep_size_and_exclude_self() {
        assert_eq!(
            find_alternatives("t3.medium"),
            vec!["t4g.medium".to_string(), "t3a.medium".to_string()]
        );
        assert_eq!(
            find_alternatives("db.r5.xlarge"),
            vec!["db.r7g.xlarge".to_string(), "db.r6g.xlarge".to_string()]
        );
    }

    #[test]
    fn test_unknown_family_has_no_alternatives() {
        assert!(find_alternatives("x2idn.large").is_empty());
        assert!(find_alternatives("garbage").is_empty());
    }

    #[tokio::test]
    async fn test_priced_alternatives_sorted_cheapest_first() {
        let table = StaticPriceTable::builtin();
        let report = cheaper_alternatives("t3.large", Service::Ec2, "us-east-1", &table).await;

        assert_eq!(report.current_price, Some(0.0832));
        let types: Vec<_> = report
            .alternatives
            .iter()
            .map(|a| a.instance_type.as_str())
            .collect();
        assert_eq!(types, vec!["t4g.large", "t3a.large"]);
        assert_eq!(report.alternatives[0].savings_percent, 19.2);
        assert_eq!(report.cheaper().count(), 2);
    }

    #[tokio::test]
    async fn test_unpriced_current_yields_no_alternatives() {
        let table = StaticPriceTable::builtin();
        let report = cheaper_alternatives("m5a.large", Service::Ec2, "us-east-1", &table).await;
        assert_eq!(report.current_price, None);
        assert!(report.alternatives.is_empty());
    }
}
