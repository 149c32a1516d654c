//! Error types for the rightsizing library
//!
//! Data conditions found while sizing an instance are reported as
//! [`ReasonCode`](crate::models::ReasonCode) values, not errors. The types
//! here cover malformed input files and invalid configuration.

use crate::models::{ReasonCode, Service};
use std::path::PathBuf;
use thiserror::Error;

/// Instance type could not be decomposed into family and size
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("instance type {0:?} does not have a recognised shape")]
    Unparseable(String),

    #[error("instance type {instance_type:?} has unknown size {size:?}")]
    UnknownSize { instance_type: String, size: String },
}

impl ParseError {
    pub fn reason(&self) -> ReasonCode {
        match self {
            ParseError::Unparseable(_) => ReasonCode::UnparseableSize,
            ParseError::UnknownSize { .. } => ReasonCode::UnknownSizeMultiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown service {0:?} (expected ec2, rds, docdb or elasticache)")]
pub struct ServiceParseError(pub String);

/// Invalid recommender configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("target band lower bound must be positive, got {0}")]
    NonPositiveLow(f64),

    #[error("target band upper bound must not exceed 100, got {0}")]
    HighAboveHundred(f64),

    #[error("target band is empty: low {low} must be below high {high}")]
    EmptyBand { low: f64, high: f64 },

    #[error("hours per month must be positive, got {0}")]
    NonPositiveHours(f64),
}

#[derive(Debug, Error)]
pub enum PriceTableError {
    #[error("failed to read price file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse price file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown service {0:?} in price file")]
    UnknownService(String),

    #[error("price for {instance_type} must be positive, got {price}")]
    InvalidPrice { instance_type: String, price: f64 },
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("line {line}: data row before any section header")]
    RowOutsideSection { line: usize },

    #[error("line {line}: unknown section {header:?}")]
    UnknownSection { line: usize, header: String },

    #[error("line {line}: expected at least 4 tab-separated columns, found {found}")]
    MissingColumns { line: usize, found: usize },

    #[error("line {line}: invalid {field} value {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("invalid JSON inventory: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SavingsError {
    #[error("no {service} price for {instance_type}")]
    PriceUnavailable {
        instance_type: String,
        service: Service,
    },

    #[error("instance count must be at least 1")]
    ZeroCount,
}
