//! # Impact Analytics
//!
//! This crate turns A/B test results and financial assumptions into money.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every entry point takes immutable inputs and returns a
//!   fresh report. Nothing is cached or shared, so all of it is safe to call from
//!   any number of threads.
//!
//! ## Public API
//!
//! - `FinancialModel`: discounted cash-flow projection of a test arm (NPV and LTV).
//! - `UnitEconomics`: blended lifetime value of one sale across a product mix.
//! - `analyze_impact`: break-even hurdle and executive summary for a rollout.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod impact;
pub mod model;
pub mod report;
pub mod unit_economics;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use impact::{analyze_impact, ImpactInputs};
pub use model::FinancialModel;
pub use report::{ImpactReport, ROIResult};
pub use unit_economics::{baseline_revenue, TierEconomics, UnitEconomics};
