use core_types::ProductTier;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub campaign: Campaign,
    pub conversion: Conversion,
    /// The insurance plans on offer and their observed mix.
    pub products: Vec<ProductTier>,
    pub projection: Projection,
    #[serde(default)] // Use default values if the [simulation] section is missing
    pub simulation: Simulation,
}

/// The stakes of the test: who sees it and what it costs.
#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    /// Visitors in the test group, or projected traffic for the rollout.
    pub traffic: Decimal,
    /// Total cost of the project (development plus marketing spend).
    pub cost: Decimal,
    /// Renewal rate, in percent, for plans without their own retention figure.
    #[serde(default = "default_retention_pct")]
    pub default_retention_pct: Decimal,
}

/// Conversion rates observed in the A/B test, as fractions (0.02 = 2%).
#[derive(Debug, Clone, Deserialize)]
pub struct Conversion {
    pub control_rate: Decimal,
    pub variant_rate: Decimal,
}

/// Assumptions for the discounted cash-flow projection.
#[derive(Debug, Clone, Deserialize)]
pub struct Projection {
    /// Revenue per period at the control conversion rate. When omitted it is
    /// derived from traffic, the control rate and the blended LTV.
    #[serde(default)]
    pub baseline_revenue: Option<Decimal>,
    /// Discount rate per period. 0.10 corresponds to 10%.
    pub discount_rate: Decimal,
    /// One multiplier per period; the number of entries sets the horizon.
    pub seasonality: Vec<Decimal>,
    /// Fraction of the lift lost each period.
    #[serde(default)]
    pub decay_rate: Decimal,
}

/// Contains parameters for the Monte Carlo risk simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    /// Number of simulated futures.
    pub runs: usize,
    /// Relative spread applied to the variant conversion rate.
    /// 0.10 means one standard deviation is 10% of the observed rate.
    pub volatility: Decimal,
    /// Fixes the random sequence so runs are reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

// --- Default Implementations ---
// This allows a user to omit the `[simulation]` section from their toml
// and still have it work with sensible defaults.

impl Default for Simulation {
    fn default() -> Self {
        Self {
            runs: 1000,
            volatility: dec!(0.10),
            seed: None,
        }
    }
}

fn default_retention_pct() -> Decimal {
    dec!(85)
}

impl Campaign {
    /// The default renewal rate as a fraction.
    pub fn default_retention(&self) -> Decimal {
        self.default_retention_pct / Decimal::ONE_HUNDRED
    }
}
