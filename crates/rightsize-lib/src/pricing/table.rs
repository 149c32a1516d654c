//! Static on-demand price table
//!
//! Ships with a built-in set of Linux on-demand prices used when no live
//! pricing source is available, and can be extended from a JSON file of the
//! form `{ "ec2": { "t3.large": 0.0832 }, "rds": { ... } }`.

use super::{async_trait, PriceLookup};
use crate::error::PriceTableError;
use crate::models::Service;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const EC2_PRICES: &[(&str, f64)] = &[
    ("t3.nano", 0.0052),
    ("t3.micro", 0.0104),
    ("t3.small", 0.0208),
    ("t3.medium", 0.0416),
    ("t3.large", 0.0832),
    ("t3a.nano", 0.0047),
    ("t3a.micro", 0.0094),
    ("t3a.small", 0.0188),
    ("t3a.medium", 0.0376),
    ("t3a.large", 0.0752),
    ("t4g.nano", 0.0042),
    ("t4g.micro", 0.0084),
    ("t4g.small", 0.0168),
    ("t4g.medium", 0.0336),
    ("t4g.large", 0.0672),
    ("m5.large", 0.096),
    ("m5.xlarge", 0.192),
    ("m6i.large", 0.096),
    ("c5.large", 0.085),
    ("c5.xlarge", 0.17),
    ("r5.large", 0.126),
];

const RDS_PRICES: &[(&str, f64)] = &[
    ("db.t3.micro", 0.018),
    ("db.t3.small", 0.036),
    ("db.t3.medium", 0.072),
    ("db.t3.large", 0.144),
    ("db.t4g.micro", 0.016),
    ("db.t4g.small", 0.032),
    ("db.t4g.medium", 0.065),
    ("db.t4g.large", 0.129),
    ("db.r5.large", 0.25),
    ("db.r5.xlarge", 0.50),
    ("db.r6g.large", 0.218),
    ("db.r6g.xlarge", 0.435),
    ("db.m5.large", 0.185),
    ("db.m5.xlarge", 0.37),
    ("db.m6g.large", 0.158),
];

const ELASTICACHE_PRICES: &[(&str, f64)] = &[
    ("cache.t3.micro", 0.017),
    ("cache.t3.small", 0.034),
    ("cache.t3.medium", 0.068),
    ("cache.t4g.micro", 0.016),
    ("cache.t4g.small", 0.032),
    ("cache.t4g.medium", 0.064),
    ("cache.r5.large", 0.24),
    ("cache.r6g.large", 0.218),
    ("cache.m5.large", 0.17),
];

/// Region-agnostic hourly prices per service
#[derive(Debug, Clone, Default)]
pub struct StaticPriceTable {
    prices: HashMap<Service, HashMap<String, f64>>,
}

impl StaticPriceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table preloaded with the built-in fallback prices
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (service, entries) in [
            (Service::Ec2, EC2_PRICES),
            (Service::Rds, RDS_PRICES),
            (Service::Elasticache, ELASTICACHE_PRICES),
        ] {
            for (instance_type, price) in entries {
                table.insert(service, *instance_type, *price);
            }
        }
        table
    }

    pub fn insert(&mut self, service: Service, instance_type: impl Into<String>, price: f64) {
        self.prices
            .entry(service)
            .or_default()
            .insert(instance_type.into(), price);
    }

    /// Parse a JSON price document
    pub fn from_json_str(json: &str) -> Result<Self, PriceTableError> {
        let raw: HashMap<String, HashMap<String, f64>> = serde_json::from_str(json)?;

        let mut table = Self::empty();
        for (service_name, entries) in raw {
            let service: Service = service_name
                .parse()
                .map_err(|_| PriceTableError::UnknownService(service_name.clone()))?;

            for (instance_type, price) in entries {
                if !(price.is_finite() && price > 0.0) {
                    return Err(PriceTableError::InvalidPrice {
                        instance_type,
                        price,
                    });
                }
                table.insert(service, instance_type, price);
            }
        }

        Ok(table)
    }

    /// Load a JSON price file from disk
    pub fn load_file(path: &Path) -> Result<Self, PriceTableError> {
        let content = std::fs::read_to_string(path).map_err(|source| PriceTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&content)?;
        debug!(path = %path.display(), entries = table.len(), "Loaded price file");
        Ok(table)
    }

    /// Copy entries from `other`, overriding existing prices
    pub fn merge(&mut self, other: StaticPriceTable) {
        for (service, entries) in other.prices {
            self.prices.entry(service).or_default().extend(entries);
        }
    }

    pub fn get(&self, service: Service, instance_type: &str) -> Option<f64> {
        let direct = self
            .prices
            .get(&service)
            .and_then(|entries| entries.get(instance_type))
            .copied();

        match (direct, service) {
            // DocumentDB shares db.* instance classes with RDS
            (None, Service::Docdb) => self.get(Service::Rds, instance_type),
            (price, _) => price,
        }
    }

    /// Total number of priced instance types across services
    pub fn len(&self) -> usize {
        self.prices.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PriceLookup for StaticPriceTable {
    async fn hourly_price(
        &self,
        instance_type: &str,
        _region: &str,
        service: Service,
    ) -> Option<f64> {
        self.get(service, instance_type)
    }
}
