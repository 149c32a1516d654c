//! Price, alternatives and savings commands

use anyhow::{bail, Result};
use colored::Colorize;
use rightsize_lib::pricing::{calculate_savings, cheaper_alternatives, usable_price};
use rightsize_lib::{round_to, PriceLookup};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{
    format_currency, format_hourly, print_json, print_table, print_warning, OutputFormat,
};

/// Row for the alternatives table
#[derive(Tabled)]
struct AlternativeRow {
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Hourly")]
    hourly: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Savings")]
    savings: String,
}

#[derive(Serialize)]
struct PriceReport<'a> {
    instance_type: &'a str,
    service: rightsize_lib::Service,
    region: &'a str,
    hourly_price: f64,
    monthly_price: f64,
}

fn hours(ctx: &Context) -> f64 {
    ctx.recommender.config().hours_per_month
}

pub async fn show_price(ctx: &Context, instance_type: &str) -> Result<()> {
    let Some(hourly) = usable_price(
        ctx.prices
            .hourly_price(instance_type, &ctx.region, ctx.service)
            .await,
    ) else {
        bail!("No {} price known for {}", ctx.service, instance_type);
    };

    let monthly = hourly * hours(ctx);
    match ctx.format {
        OutputFormat::Json => print_json(&PriceReport {
            instance_type,
            service: ctx.service,
            region: &ctx.region,
            hourly_price: hourly,
            monthly_price: round_to(monthly, 2),
        })?,
        OutputFormat::Table => {
            println!("{} ({}, {})", instance_type.bold(), ctx.service, ctx.region);
            println!("Hourly:                 {}", format_hourly(hourly));
            println!("Monthly:                {}", format_currency(monthly));
        }
    }

    Ok(())
}

pub async fn show_alternatives(ctx: &Context, instance_type: &str) -> Result<()> {
    let report = cheaper_alternatives(instance_type, ctx.service, &ctx.region, &ctx.prices).await;

    match ctx.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let Some(current) = report.current_price else {
                print_warning(&format!(
                    "No {} price known for {}, cannot compare alternatives",
                    ctx.service, instance_type
                ));
                return Ok(());
            };

            println!(
                "{} {} ({}/month)",
                "Alternatives to".bold(),
                instance_type.bold(),
                format_currency(current * hours(ctx))
            );

            let rows = report
                .alternatives
                .iter()
                .map(|alt| {
                    let savings = format!("{:.1}%", alt.savings_percent);
                    AlternativeRow {
                        instance_type: alt.instance_type.clone(),
                        hourly: format_hourly(alt.hourly_price),
                        monthly: format_currency(alt.hourly_price * hours(ctx)),
                        savings: if alt.savings_percent > 0.0 {
                            savings.green().to_string()
                        } else {
                            savings.red().to_string()
                        },
                    }
                })
                .collect();
            print_table(rows);
        }
    }

    Ok(())
}

pub async fn show_savings(
    ctx: &Context,
    current_type: &str,
    proposed_type: &str,
    count: u32,
) -> Result<()> {
    let estimate = calculate_savings(
        current_type,
        proposed_type,
        count,
        ctx.service,
        &ctx.region,
        &ctx.prices,
        hours(ctx),
    )
    .await?;

    match ctx.format {
        OutputFormat::Json => print_json(&estimate)?,
        OutputFormat::Table => {
            println!("{}", "Savings Estimate".bold());
            println!("{}", "=".repeat(50));
            println!(
                "Change:                 {} → {} (x{})",
                estimate.current_type, estimate.proposed_type, estimate.count
            );
            println!(
                "Current monthly:        {}",
                format_currency(estimate.current_monthly)
            );
            println!(
                "Proposed monthly:       {}",
                format_currency(estimate.proposed_monthly)
            );

            let monthly = format_currency(estimate.monthly_savings);
            if estimate.monthly_savings >= 0.0 {
                println!("{}  {}", "Monthly savings:".bold(), monthly.green().bold());
            } else {
                println!("{}  {}", "Monthly savings:".bold(), monthly.red().bold());
            }
            println!(
                "Yearly savings:         {}",
                format_currency(estimate.yearly_savings)
            );
        }
    }

    Ok(())
}
