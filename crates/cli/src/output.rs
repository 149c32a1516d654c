//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rightsize_lib::{Outcome, ReasonCode, RecommendationNote};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Monthly and yearly amounts
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Hourly prices keep four decimals so small types stay distinguishable
pub fn format_hourly(amount: f64) -> String {
    format!("${:.4}/h", amount)
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "-".to_string(),
    }
}

/// Color an outcome label by how actionable it is
pub fn color_outcome(outcome: &Outcome) -> String {
    let label = outcome.label();
    match outcome {
        Outcome::Recommended {
            note: RecommendationNote::Recommended,
            ..
        } => label.green().to_string(),
        Outcome::Recommended { .. } => label.green().bold().to_string(),
        Outcome::NoRecommendation { reason } => match reason {
            ReasonCode::Adequate | ReasonCode::MinimumConfiguration => label.to_string(),
            ReasonCode::UnderProvisioned => label.red().to_string(),
            _ => label.yellow().to_string(),
        },
    }
}
