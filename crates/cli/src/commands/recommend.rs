//! Inventory sizing command

use anyhow::{Context as _, Result};
use colored::Colorize;
use rightsize_lib::{inventory, BatchOutcome, BatchSummary, Outcome, RecommendationNote};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use super::Context;
use crate::output::{
    color_outcome, format_currency, format_percent, print_info, print_json, print_success,
    print_table, print_warning, OutputFormat,
};

/// Row for the recommendations table
#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Type")]
    instance_type: String,
    #[tabled(rename = "Count")]
    count: u32,
    #[tabled(rename = "Recommended")]
    recommended: String,
    #[tabled(rename = "Predicted CPU")]
    predicted: String,
    #[tabled(rename = "Monthly Savings")]
    monthly_savings: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&BatchOutcome> for OutcomeRow {
    fn from(item: &BatchOutcome) -> Self {
        let recommendation = item.outcome.recommendation();
        Self {
            name: item.name.clone(),
            service: item.service.to_string(),
            instance_type: item.instance_type.clone(),
            count: item.count,
            recommended: recommendation
                .map(|r| r.recommended_type.clone())
                .unwrap_or_else(|| "-".to_string()),
            predicted: format_percent(recommendation.map(|r| r.predicted_utilization)),
            monthly_savings: recommendation
                .map(|r| format_currency(r.monthly_savings * f64::from(item.count)))
                .unwrap_or_else(|| "-".to_string()),
            result: color_outcome(&item.outcome),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    region: &'a str,
    outcomes: Vec<BatchOutcome>,
    summary: &'a BatchSummary,
}

pub async fn run(ctx: &Context, input: &Path, only_actionable: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read inventory {}", input.display()))?;
    let items = inventory::read_inventory(&text)
        .with_context(|| format!("Failed to parse inventory {}", input.display()))?;

    let outcomes = ctx
        .recommender
        .recommend_batch(&items, &ctx.prices, &ctx.region)
        .await;
    let summary = BatchSummary::from_outcomes(&outcomes);

    let shown: Vec<BatchOutcome> = outcomes
        .into_iter()
        .filter(|o| !only_actionable || o.outcome.recommendation().is_some())
        .map(|o| BatchOutcome {
            outcome: o.outcome.rounded(),
            ..o
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => print_json(&Report {
            region: &ctx.region,
            outcomes: shown,
            summary: &summary,
        })?,
        OutputFormat::Table => print_report(&shown, &summary, &ctx.region),
    }

    Ok(())
}

fn print_report(outcomes: &[BatchOutcome], summary: &BatchSummary, region: &str) {
    println!("{} ({})", "Scale-down Recommendations".bold(), region);
    print_table(outcomes.iter().map(OutcomeRow::from).collect());
    println!();

    println!("Instances checked:      {}", summary.total);
    for (reason, count) in &summary.by_reason {
        println!("  {:<22}{}", format!("{}:", reason.label()), count);
    }

    if summary.recommended == 0 {
        print_info("No cheaper instance types found");
        return;
    }

    print_success(&format!(
        "{} recommendation(s), potential savings {} per month ({} per year)",
        summary.recommended,
        format_currency(summary.total_monthly_savings).green().bold(),
        format_currency(summary.total_monthly_savings * 12.0)
    ));

    let floor_limited = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o.outcome,
                Outcome::Recommended {
                    note: RecommendationNote::MoreSavingsPossible,
                    ..
                }
            )
        })
        .count();
    if floor_limited > 0 {
        print_warning(&format!(
            "{} instance(s) stay below the target band even at the smallest offered size",
            floor_limited
        ));
    }
}
