//! Rightsizing agent
//!
//! Serves scale-down recommendations, prices and savings estimates over
//! HTTP, alongside health probes and Prometheus metrics.

pub mod api;
pub mod config;
