//! Core data models for the rightsizing engine

use crate::error::ServiceParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cloud service an instance belongs to
///
/// Drives both the family floor table and price routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Ec2,
    Rds,
    Docdb,
    Elasticache,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::Ec2,
        Service::Rds,
        Service::Docdb,
        Service::Elasticache,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Ec2 => "ec2",
            Service::Rds => "rds",
            Service::Docdb => "docdb",
            Service::Elasticache => "elasticache",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = ServiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ec2" => Ok(Service::Ec2),
            "rds" => Ok(Service::Rds),
            "docdb" | "documentdb" => Ok(Service::Docdb),
            "elasticache" | "redis" | "memcache" | "memcached" => Ok(Service::Elasticache),
            _ => Err(ServiceParseError(s.to_string())),
        }
    }
}

/// Why no recommendation was produced for an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Adequate,
    UnderProvisioned,
    UnparseableSize,
    UnknownSizeMultiplier,
    PriceUnavailable,
    MinimumConfiguration,
    NoSafeCandidate,
    UtilizationUnavailable,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 8] = [
        ReasonCode::Adequate,
        ReasonCode::UnderProvisioned,
        ReasonCode::UnparseableSize,
        ReasonCode::UnknownSizeMultiplier,
        ReasonCode::PriceUnavailable,
        ReasonCode::MinimumConfiguration,
        ReasonCode::NoSafeCandidate,
        ReasonCode::UtilizationUnavailable,
    ];

    /// Wire token, as used in JSON and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Adequate => "adequate",
            ReasonCode::UnderProvisioned => "under_provisioned",
            ReasonCode::UnparseableSize => "unparseable_size",
            ReasonCode::UnknownSizeMultiplier => "unknown_size_multiplier",
            ReasonCode::PriceUnavailable => "price_unavailable",
            ReasonCode::MinimumConfiguration => "minimum_configuration",
            ReasonCode::NoSafeCandidate => "no_safe_candidate",
            ReasonCode::UtilizationUnavailable => "utilization_unavailable",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            ReasonCode::Adequate => "already optimally sized",
            ReasonCode::UnderProvisioned => "under-provisioned, consider scaling up",
            ReasonCode::UnparseableSize => "instance type not recognised",
            ReasonCode::UnknownSizeMultiplier => "unknown instance size",
            ReasonCode::PriceUnavailable => "price not available",
            ReasonCode::MinimumConfiguration => "minimum available configuration",
            ReasonCode::NoSafeCandidate => "no cheaper size keeps utilization in range",
            ReasonCode::UtilizationUnavailable => "no utilization data",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualifies an accepted recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationNote {
    /// Predicted utilization lands inside the target band
    Recommended,
    /// The smallest offered size still leaves utilization below the band
    MoreSavingsPossible,
}

impl RecommendationNote {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationNote::Recommended => "recommended",
            RecommendationNote::MoreSavingsPossible => "over-provisioned, more savings possible",
        }
    }
}

/// A cheaper instance type that keeps predicted utilization safe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommended_type: String,
    pub predicted_utilization: f64,
    pub current_price: f64,
    pub recommended_price: f64,
    pub hourly_savings: f64,
    pub monthly_savings: f64,
    pub savings_percent: f64,
}

impl Recommendation {
    /// Copy rounded for display: hourly prices to 4 places, the rest to 2
    pub fn rounded(&self) -> Self {
        Self {
            recommended_type: self.recommended_type.clone(),
            predicted_utilization: round_to(self.predicted_utilization, 2),
            current_price: round_to(self.current_price, 4),
            recommended_price: round_to(self.recommended_price, 4),
            hourly_savings: round_to(self.hourly_savings, 4),
            monthly_savings: round_to(self.monthly_savings, 2),
            savings_percent: round_to(self.savings_percent, 2),
        }
    }
}

/// Result of sizing a single instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Recommended {
        recommendation: Recommendation,
        note: RecommendationNote,
    },
    NoRecommendation {
        reason: ReasonCode,
    },
}

impl Outcome {
    pub fn none(reason: ReasonCode) -> Self {
        Outcome::NoRecommendation { reason }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Outcome::Recommended { recommendation, .. } => Some(recommendation),
            Outcome::NoRecommendation { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Outcome::Recommended { .. } => None,
            Outcome::NoRecommendation { reason } => Some(*reason),
        }
    }

    /// Label used for the outcome in reports and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Recommended { note, .. } => note.label(),
            Outcome::NoRecommendation { reason } => reason.label(),
        }
    }

    /// Metric label: `recommended` or the reason token
    pub fn metric_label(&self) -> &'static str {
        match self {
            Outcome::Recommended { .. } => "recommended",
            Outcome::NoRecommendation { reason } => reason.as_str(),
        }
    }

    pub fn rounded(&self) -> Self {
        match self {
            Outcome::Recommended {
                recommendation,
                note,
            } => Outcome::Recommended {
                recommendation: recommendation.rounded(),
                note: *note,
            },
            other => other.clone(),
        }
    }
}

/// One instance to size in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub name: String,
    pub instance_type: String,
    /// Observed CPU utilization in percent; absent when no datapoints exist
    #[serde(default)]
    pub utilization: Option<f64>,
    pub service: Service,
    /// Number of identical instances (cluster members); used for totals only
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

impl BatchItem {
    pub fn new(
        name: impl Into<String>,
        instance_type: impl Into<String>,
        utilization: Option<f64>,
        service: Service,
    ) -> Self {
        Self {
            name: name.into(),
            instance_type: instance_type.into(),
            utilization,
            service,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

/// Outcome of a batch item, tagged with the item's identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub name: String,
    pub instance_type: String,
    pub service: Service,
    pub count: u32,
    pub outcome: Outcome,
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
