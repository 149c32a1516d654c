//! Family floor table
//!
//! Smallest size a service actually sells for a family. Burstable families
//! (base name starting with `t`) go down further than the fixed-performance
//! c/m/r families, which all start at `large`.

use super::ladder::SizeTier;
use super::parser::base_family;
use crate::models::Service;

/// Whether a family token names a burstable (`t*`) family
pub fn is_burstable(family: &str) -> bool {
    base_family(family).starts_with('t')
}

/// Smallest offered size for `family` under `service`
pub fn floor_for(family: &str, service: Service) -> SizeTier {
    if !is_burstable(family) {
        return SizeTier::Large;
    }

    match service {
        Service::Ec2 => SizeTier::Nano,
        Service::Rds | Service::Docdb => SizeTier::Medium,
        Service::Elasticache => SizeTier::Micro,
    }
}
