//! # Risk Simulation
//!
//! Every input to an impact analysis is an estimate. This crate replays the
//! analysis many times with the conversion rates and renewal rate jittered
//! around their observed values, and reports how often the strategy still
//! makes money.

pub mod error;
pub mod monte_carlo;

pub use error::RiskError;
pub use monte_carlo::{percentile, MonteCarloSimulator, RiskReport};
