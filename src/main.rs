use analytics::{
    analyze_impact, baseline_revenue, FinancialModel, ImpactInputs, ImpactReport, ROIResult,
    UnitEconomics,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::{FinancialAssumptions, TestArm};
use indicatif::{ProgressBar, ProgressStyle};
use risk::{MonteCarloSimulator, RiskReport};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the strategy impact calculator.
fn main() -> Result<()> {
    // Load IMPACT__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    info!(path = %cli.config.display(), "Loaded configuration");

    // Execute the appropriate command
    match cli.command {
        Commands::Project(args) => handle_project(&config, args, cli.json),
        Commands::Impact => handle_impact(&config, cli.json),
        Commands::Simulate(args) => handle_simulate(config, args, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// From conversion rate to bottom-line ROI: is your A/B test actually profitable?
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(long, short, global = true, default_value = configuration::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the report as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the variant's cash flows over the horizon (NPV and lifetime value).
    Project(ProjectArgs),
    /// Blend the product mix, find the break-even hurdle and summarize the rollout.
    Impact,
    /// Stress the rollout against randomized conversion and renewal rates.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct ProjectArgs {
    /// Relative lift over control (0.15 = +15%). Defaults to the lift the
    /// configured conversion rates imply.
    #[arg(long, allow_hyphen_values = true)]
    lift: Option<Decimal>,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Number of simulated futures.
    #[arg(long)]
    runs: Option<usize>,

    /// Relative spread of the variant conversion rate (0.10 = 10%).
    #[arg(long)]
    volatility: Option<Decimal>,

    /// Seed for a reproducible simulation.
    #[arg(long)]
    seed: Option<u64>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

#[derive(Serialize)]
struct ProjectOutput<'a> {
    arm: &'a TestArm,
    assumptions: &'a FinancialAssumptions,
    result: &'a ROIResult,
    roi: Option<Decimal>,
}

fn handle_project(config: &Config, args: ProjectArgs, json: bool) -> Result<()> {
    let economics = blend_products(config)?;
    let arm = build_test_arm(config, args.lift)?;
    let assumptions = build_assumptions(config, &economics)?;

    let result = FinancialModel::new().evaluate(&arm, &assumptions)?;
    let roi = result.roi(config.campaign.cost);

    if json {
        let output = ProjectOutput {
            arm: &arm,
            assumptions: &assumptions,
            result: &result,
            roi,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::projection(&arm, &assumptions, &result, config.campaign.cost, roi);
    }
    Ok(())
}

#[derive(Serialize)]
struct ImpactOutput<'a> {
    unit_economics: &'a UnitEconomics,
    impact: &'a ImpactReport,
}

fn handle_impact(config: &Config, json: bool) -> Result<()> {
    let economics = blend_products(config)?;
    let impact = analyze_impact(&impact_inputs(config, &economics))?;

    if json {
        let output = ImpactOutput {
            unit_economics: &economics,
            impact: &impact,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render::unit_economics(&economics);
        render::impact(&impact, config.campaign.cost);
    }
    Ok(())
}

fn handle_simulate(mut config: Config, args: SimulateArgs, json: bool) -> Result<()> {
    if let Some(runs) = args.runs {
        config.simulation.runs = runs;
    }
    if let Some(volatility) = args.volatility {
        config.simulation.volatility = volatility;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let economics = blend_products(&config)?;
    let inputs = impact_inputs(&config, &economics);
    let simulator = MonteCarloSimulator::new(config.simulation.clone())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Crunching {} scenarios...", config.simulation.runs));

    let report: RiskReport = simulator.run(&inputs, &economics)?;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::risk(&report);
    }
    Ok(())
}

// ==============================================================================
// Bridging configuration into the models
// ==============================================================================

fn blend_products(config: &Config) -> Result<UnitEconomics> {
    UnitEconomics::from_products(&config.products, config.campaign.default_retention())
        .context("Failed to blend the product mix")
}

fn impact_inputs(config: &Config, economics: &UnitEconomics) -> ImpactInputs {
    ImpactInputs {
        traffic: config.campaign.traffic,
        cost: config.campaign.cost,
        control_rate: config.conversion.control_rate,
        variant_rate: config.conversion.variant_rate,
        blended_ltv: economics.blended_ltv,
    }
}

/// The control arm with either an explicit lift or the one the observed rates imply.
fn build_test_arm(config: &Config, lift: Option<Decimal>) -> Result<TestArm> {
    let control = config.conversion.control_rate;
    let lift = match lift {
        Some(lift) => lift,
        None if control.is_zero() => {
            bail!("control_rate is 0, so the lift must be given with --lift")
        }
        None => config.conversion.variant_rate / control - Decimal::ONE,
    };
    Ok(TestArm::new(control, lift))
}

fn build_assumptions(config: &Config, economics: &UnitEconomics) -> Result<FinancialAssumptions> {
    let projection = &config.projection;
    let baseline = match projection.baseline_revenue {
        Some(revenue) => revenue,
        None => baseline_revenue(
            config.campaign.traffic,
            config.conversion.control_rate,
            economics.blended_ltv,
        )
        .context("Failed to derive the baseline revenue")?,
    };
    Ok(FinancialAssumptions {
        baseline_revenue: baseline,
        discount_rate: projection.discount_rate,
        seasonality: projection.seasonality.clone(),
        decay_rate: projection.decay_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SETTINGS: &str = r#"
[campaign]
traffic = 10000
cost = 5000

[conversion]
control_rate = 0.02
variant_rate = 0.023

[[products]]
name = "Basic Cover"
year1_price = 100
year2_price = 200
mix_pct = 1
retention_pct = 50

[projection]
discount_rate = 0.10
seasonality = [1.0, 1.0]
"#;

    fn config() -> Config {
        configuration::load_config_str(SETTINGS).unwrap()
    }

    #[test]
    fn lift_is_implied_by_the_observed_rates() {
        let arm = build_test_arm(&config(), None).unwrap();
        assert_eq!(arm.conversion_rate, dec!(0.02));
        assert_eq!(arm.lift, dec!(0.15));
    }

    #[test]
    fn explicit_lift_wins() {
        let arm = build_test_arm(&config(), Some(dec!(-0.05))).unwrap();
        assert_eq!(arm.lift, dec!(-0.05));
    }

    #[test]
    fn zero_control_rate_needs_an_explicit_lift() {
        let mut config = config();
        config.conversion.control_rate = Decimal::ZERO;
        assert!(build_test_arm(&config, None).is_err());
        assert!(build_test_arm(&config, Some(dec!(0.1))).is_ok());
    }

    #[test]
    fn baseline_revenue_is_derived_when_not_configured() {
        let config = config();
        let economics = blend_products(&config).unwrap();
        let assumptions = build_assumptions(&config, &economics).unwrap();

        // 10000 visitors * 2% * (100 + 200 * 0.5)
        assert_eq!(assumptions.baseline_revenue, dec!(40000));
        assert_eq!(assumptions.horizon(), 2);
    }

    #[test]
    fn configured_baseline_revenue_is_used_as_is() {
        let mut config = config();
        config.projection.baseline_revenue = Some(dec!(1000));
        let economics = blend_products(&config).unwrap();
        assert_eq!(
            build_assumptions(&config, &economics).unwrap().baseline_revenue,
            dec!(1000)
        );
    }
}
