//! Monthly savings of switching instance types

use super::{usable_price, PriceLookup};
use crate::error::SavingsError;
use crate::models::Service;
use serde::{Deserialize, Serialize};

/// Cost comparison of `count` instances before and after a type change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub current_type: String,
    pub proposed_type: String,
    pub count: u32,
    pub current_monthly: f64,
    pub proposed_monthly: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
}

pub async fn calculate_savings(
    current_type: &str,
    proposed_type: &str,
    count: u32,
    service: Service,
    region: &str,
    lookup: &dyn PriceLookup,
    hours_per_month: f64,
) -> Result<SavingsEstimate, SavingsError> {
    if count == 0 {
        return Err(SavingsError::ZeroCount);
    }

    let current_price = required_price(current_type, service, region, lookup).await?;
    let proposed_price = required_price(proposed_type, service, region, lookup).await?;

    let instances = f64::from(count);
    let current_monthly = current_price * hours_per_month * instances;
    let proposed_monthly = proposed_price * hours_per_month * instances;
    let monthly_savings = current_monthly - proposed_monthly;

    Ok(SavingsEstimate {
        current_type: current_type.to_string(),
        proposed_type: proposed_type.to_string(),
        count,
        current_monthly,
        proposed_monthly,
        monthly_savings,
        yearly_savings: monthly_savings * 12.0,
    })
}

async fn required_price(
    instance_type: &str,
    service: Service,
    region: &str,
    lookup: &dyn PriceLookup,
) -> Result<f64, SavingsError> {
    usable_price(lookup.hourly_price(instance_type, region, service).await).ok_or_else(|| {
        SavingsError::PriceUnavailable {
            instance_type: instance_type.to_string(),
            service,
        }
    })
}
