//! CLI subcommands

pub mod pricing;
pub mod recommend;

use crate::output::OutputFormat;
use rightsize_lib::{ScaleDownRecommender, Service, StaticPriceTable};

/// Settings resolved from flags and the config file
pub struct Context {
    pub region: String,
    pub service: Service,
    pub prices: StaticPriceTable,
    pub recommender: ScaleDownRecommender,
    pub format: OutputFormat,
}
