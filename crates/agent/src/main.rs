//! Rightsizing agent - scale-down recommendation service
//!
//! Loads the price table once at startup and serves the recommendation
//! API until interrupted.

use anyhow::Result;
use rightsize_agent::{api, config::AgentConfig};
use rightsize_lib::{
    health::{components, HealthRegistry},
    observability::{RecommenderMetrics, StructuredLogger},
    PriceLookup, ScaleDownRecommender, StaticPriceTable,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting rightsize-agent");

    let config = AgentConfig::load()?;
    info!(
        region = %config.region,
        target_low = config.recommender.target_low,
        target_high = config.recommender.target_high,
        "Agent configured"
    );

    let health_registry = HealthRegistry::new();
    let metrics = RecommenderMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let recommender = ScaleDownRecommender::new(config.recommender)?;
    health_registry.set_healthy(components::RECOMMENDER).await;

    let mut prices = StaticPriceTable::builtin();
    match &config.price_file {
        Some(path) => {
            let shown = path.display().to_string();
            match StaticPriceTable::load_file(path) {
                Ok(overrides) => {
                    logger.log_price_file(&shown, Ok(overrides.len()));
                    prices.merge(overrides);
                    health_registry.set_healthy(components::PRICE_TABLE).await;
                }
                Err(e) => {
                    let message = e.to_string();
                    logger.log_price_file(&shown, Err(&message));
                    health_registry
                        .set_degraded(components::PRICE_TABLE, message)
                        .await;
                }
            }
        }
        None => health_registry.set_healthy(components::PRICE_TABLE).await,
    }

    let price_entries = prices.len();
    let prices: Arc<dyn PriceLookup> = Arc::new(prices);

    let app_state = Arc::new(
        api::AppState::new(
            health_registry.clone(),
            metrics,
            logger.clone(),
            recommender,
            prices,
            config.region.clone(),
        )
        .with_batch_concurrency(config.batch_concurrency),
    );

    health_registry.set_ready(true).await;

    let listen_addr = format!("0.0.0.0:{}", config.api_port);
    logger.log_startup(AGENT_VERSION, &listen_addr, price_entries);

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = api_handle => {
            result??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
