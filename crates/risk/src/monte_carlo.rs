use crate::error::RiskError;
use analytics::{ImpactInputs, UnitEconomics};
use configuration::Simulation;
use core_types::RiskBand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Renewal rates are clipped to this range after sampling.
const MIN_RETENTION: f64 = 0.1;
const MAX_RETENTION: f64 = 1.0;

/// Distribution of simulated outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub runs: usize,
    /// Share of runs with a strictly positive net profit, in percent.
    pub win_rate_pct: Decimal,
    /// 95th percentile of net profit.
    pub best_case: Decimal,
    /// 5th percentile of net profit.
    pub worst_case: Decimal,
    pub mean_profit: Decimal,
    pub risk_band: RiskBand,
}

/// Replays an impact analysis under perturbed conversion and renewal rates.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    params: Simulation,
}

impl MonteCarloSimulator {
    /// Creates a new `MonteCarloSimulator` with the given configuration parameters.
    pub fn new(params: Simulation) -> Result<Self, RiskError> {
        if params.runs == 0 {
            return Err(RiskError::InvalidParameters(
                "runs must be greater than 0".to_string(),
            ));
        }
        if params.volatility < Decimal::ZERO {
            return Err(RiskError::InvalidParameters(
                "volatility must not be negative".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// Runs every scenario and summarizes the resulting net profits.
    ///
    /// Per run, the variant conversion rate is drawn with a relative spread of
    /// `volatility`, while the control rate and the portfolio renewal rate are
    /// drawn with half that spread. Run-level LTV is rebuilt from the average
    /// year one and year two prices.
    pub fn run(
        &self,
        inputs: &ImpactInputs,
        economics: &UnitEconomics,
    ) -> Result<RiskReport, RiskError> {
        inputs.validate()?;

        let volatility = to_f64(self.params.volatility, "volatility")?;
        let traffic = to_f64(inputs.traffic, "traffic")?;
        let cost = to_f64(inputs.cost, "cost")?;
        let blended_ltv = to_f64(economics.blended_ltv, "blended_ltv")?;
        let avg_year1 = to_f64(economics.avg_year1_price, "avg_year1_price")?;
        let avg_year2 = to_f64(economics.avg_year2_price, "avg_year2_price")?;

        let variant = relative_normal(to_f64(inputs.variant_rate, "variant_rate")?, volatility)?;
        let control = relative_normal(to_f64(inputs.control_rate, "control_rate")?, volatility / 2.0)?;
        let retention = relative_normal(
            to_f64(economics.effective_retention, "effective_retention")?,
            volatility / 2.0,
        )?;

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(runs = self.params.runs, volatility, "Starting risk simulation");

        let mut profits: Vec<f64> = (0..self.params.runs)
            .map(|_| {
                let variant_rate = variant.sample(&mut rng);
                let renewal = retention.sample(&mut rng).clamp(MIN_RETENTION, MAX_RETENTION);
                let control_rate = control.sample(&mut rng);

                let ltv = avg_year1 + renewal * avg_year2;
                let variant_revenue = traffic * variant_rate * ltv;
                let control_revenue = traffic * control_rate * blended_ltv;
                variant_revenue - control_revenue - cost
            })
            .collect();

        let wins = profits.iter().filter(|p| **p > 0.0).count();
        let win_rate = wins as f64 / profits.len() as f64 * 100.0;
        let mean = profits.iter().sum::<f64>() / profits.len() as f64;

        profits.sort_by(|a, b| a.total_cmp(b));
        let best = percentile(&profits, 95.0)?;
        let worst = percentile(&profits, 5.0)?;

        debug!(wins, win_rate, best, worst, "Risk simulation summary");

        Ok(RiskReport {
            runs: profits.len(),
            win_rate_pct: from_f64(win_rate, "win rate")?.round_dp(2),
            best_case: from_f64(best, "best case")?.round_dp(2),
            worst_case: from_f64(worst, "worst case")?.round_dp(2),
            mean_profit: from_f64(mean, "mean profit")?.round_dp(2),
            risk_band: RiskBand::from_win_rate(win_rate),
        })
    }
}

/// Value below which `pct` percent of an ascending slice falls, interpolating
/// linearly between the two closest ranks.
pub fn percentile(sorted: &[f64], pct: f64) -> Result<f64, RiskError> {
    if sorted.is_empty() {
        return Err(RiskError::Calculation(
            "percentile of an empty sample".to_string(),
        ));
    }
    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn relative_normal(mean: f64, relative_spread: f64) -> Result<Normal<f64>, RiskError> {
    let std_dev = (mean * relative_spread).abs();
    Normal::new(mean, std_dev).map_err(|_| RiskError::Distribution { mean, std_dev })
}

fn to_f64(value: Decimal, name: &str) -> Result<f64, RiskError> {
    value
        .to_f64()
        .ok_or_else(|| RiskError::Calculation(format!("{} does not fit in f64", name)))
}

fn from_f64(value: f64, name: &str) -> Result<Decimal, RiskError> {
    Decimal::from_f64(value)
        .ok_or_else(|| RiskError::Calculation(format!("{} is not representable ({})", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sample, 50.0).unwrap(), 3.0);
        assert_eq!(percentile(&sample, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&sample, 100.0).unwrap(), 5.0);
        assert!((percentile(&sample, 95.0).unwrap() - 4.8).abs() < 1e-12);
        assert!((percentile(&sample, 5.0).unwrap() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn percentile_of_nothing_is_an_error() {
        assert!(percentile(&[], 50.0).is_err());
    }

    #[test]
    fn zero_runs_are_rejected() {
        let params = Simulation {
            runs: 0,
            ..Simulation::default()
        };
        assert!(matches!(
            MonteCarloSimulator::new(params),
            Err(RiskError::InvalidParameters(_))
        ));
    }
}
