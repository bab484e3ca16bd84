//! Terminal tables for the three reports.

use analytics::{ImpactReport, ROIResult, UnitEconomics};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use core_types::{FinancialAssumptions, RiskBand, TestArm};
use risk::RiskReport;
use rust_decimal::Decimal;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money(value: Decimal) -> String {
    if value < Decimal::ZERO {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

fn pct(fraction: Decimal) -> String {
    format!("{:.2}%", fraction * Decimal::ONE_HUNDRED)
}

pub fn projection(
    arm: &TestArm,
    assumptions: &FinancialAssumptions,
    result: &ROIResult,
    cost: Decimal,
    roi: Option<Decimal>,
) {
    println!(
        "Conversion {} with {} lift, discounted at {} per period, decaying {} per period",
        pct(arm.conversion_rate),
        pct(arm.lift),
        pct(assumptions.discount_rate),
        pct(assumptions.decay_rate),
    );

    let mut periods = table(vec!["Period", "Seasonality", "Cash Flow", "Present Value"]);
    for (index, (cash_flow, discounted)) in result
        .cash_flows
        .iter()
        .zip(&result.discounted_cash_flows)
        .enumerate()
    {
        periods.add_row(vec![
            Cell::new(index + 1),
            Cell::new(assumptions.seasonality[index]),
            Cell::new(money(*cash_flow)),
            Cell::new(money(*discounted)),
        ]);
    }
    println!("{periods}");

    let mut summary = table(vec!["Metric", "Value"]);
    summary.add_row(vec!["Lifetime Value (undiscounted)".to_string(), money(result.lifetime_value)]);
    summary.add_row(vec!["Net Present Value".to_string(), money(result.net_present_value)]);
    summary.add_row(vec!["Implementation Cost".to_string(), money(cost)]);
    summary.add_row(vec![
        "ROI on NPV".to_string(),
        roi.map(pct).unwrap_or_else(|| "n/a".to_string()),
    ]);
    println!("{summary}");
}

pub fn unit_economics(economics: &UnitEconomics) {
    let mut tiers = table(vec!["Policy", "Mix", "Retention", "LTV"]);
    for tier in &economics.tiers {
        tiers.add_row(vec![
            tier.name.clone(),
            pct(tier.weight),
            pct(tier.retention),
            money(tier.ltv),
        ]);
    }
    println!("{tiers}");
    println!(
        "Blended LTV {} (effective portfolio retention {})",
        money(economics.blended_ltv),
        pct(economics.effective_retention)
    );
}

pub fn impact(report: &ImpactReport, cost: Decimal) {
    let mut hurdle = table(vec!["The Hurdle", "Value"]);
    if report.break_even_feasible {
        hurdle.add_row(vec!["Break-Even Conversion Rate".to_string(), pct(report.break_even_rate)]);
        hurdle.add_row(vec![
            "Lift Required".to_string(),
            report.lift_required.map(pct).unwrap_or_else(|| "n/a".to_string()),
        ]);
        let color = if report.meets_break_even { Color::Green } else { Color::Red };
        hurdle.add_row(vec![
            Cell::new("Variant Clears It"),
            Cell::new(if report.meets_break_even { "yes" } else { "no" }).fg(color),
        ]);
    } else {
        hurdle.add_row(vec![
            Cell::new("Break-Even Conversion Rate"),
            Cell::new("Cost is too high. Impossible to break even.").fg(Color::Red),
        ]);
    }
    println!("{hurdle}");

    let mut summary = table(vec!["Executive Summary", "Value"]);
    summary.add_row(vec!["Incremental Revenue (Top Line)".to_string(), money(report.incremental_revenue)]);
    summary.add_row(vec!["Return on Investment".to_string(), format!("{:.0}%", report.roi_pct)]);
    summary.add_row(vec!["Net Profit (Bottom Line)".to_string(), money(report.net_profit)]);
    println!("{summary}");

    if report.verdict.is_profitable() {
        println!(
            "{}: projected to generate {} in pure profit.",
            report.verdict,
            money(report.net_profit)
        );
    } else {
        println!(
            "{}: projected to lose {}. The lift in conversion does not cover the {} implementation cost.",
            report.verdict,
            money(report.net_profit.abs()),
            money(cost)
        );
    }
}

pub fn risk(report: &RiskReport) {
    let color = match report.risk_band {
        RiskBand::Safe => Color::Green,
        RiskBand::Moderate => Color::Yellow,
        RiskBand::High => Color::Red,
    };

    let mut summary = table(vec!["Risk & Confidence", "Value"]);
    summary.add_row(vec![Cell::new("Scenarios"), Cell::new(report.runs)]);
    summary.add_row(vec![
        Cell::new("Probability of Profit"),
        Cell::new(format!("{:.1}%", report.win_rate_pct)).fg(color),
    ]);
    summary.add_row(vec![Cell::new("Best Case (95th pct)"), Cell::new(money(report.best_case))]);
    summary.add_row(vec![Cell::new("Worst Case (5th pct)"), Cell::new(money(report.worst_case))]);
    summary.add_row(vec![Cell::new("Mean Profit"), Cell::new(money(report.mean_profit))]);
    println!("{summary}");
    println!("{}", report.risk_band.describe());
}
