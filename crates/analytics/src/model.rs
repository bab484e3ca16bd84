use crate::error::{checked, AnalyticsError};
use crate::report::ROIResult;
use core_types::{FinancialAssumptions, TestArm};
use rust_decimal::Decimal;
use tracing::debug;

/// A stateless calculator projecting the cash flows of a test arm over a horizon.
#[derive(Debug, Default, Clone, Copy)]
pub struct FinancialModel {}

impl FinancialModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for projecting a test arm.
    ///
    /// For each period `t` (starting at 1) the cash flow is
    /// `baseline_revenue * (1 + lift) * seasonality[t] * (1 - decay)^t`, discounted by
    /// `(1 + discount_rate)^t`. The net present value is the sum of the discounted
    /// flows and the lifetime value the sum of the undiscounted ones.
    ///
    /// # Arguments
    ///
    /// * `arm` - The conversion rate and lift observed in the test.
    /// * `assumptions` - Baseline revenue, discounting, seasonality and decay.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ROIResult`, or `AnalyticsError::InvalidInput` when an
    /// input is out of range.
    pub fn evaluate(
        &self,
        arm: &TestArm,
        assumptions: &FinancialAssumptions,
    ) -> Result<ROIResult, AnalyticsError> {
        arm.validate()?;
        assumptions.validate()?;

        let mut result = ROIResult::with_horizon(assumptions.horizon());

        let lifted_revenue = checked(
            Decimal::ONE
                .checked_add(arm.lift)
                .and_then(|uplift| assumptions.baseline_revenue.checked_mul(uplift)),
            "lifted revenue",
        )?;
        let retention = Decimal::ONE - assumptions.decay_rate;
        let growth = checked(Decimal::ONE.checked_add(assumptions.discount_rate), "discount growth")?;

        // Both factors are carried from period to period instead of raised to a power.
        let mut decay_factor = Decimal::ONE;
        let mut discount_factor = Decimal::ONE;

        for (index, factor) in assumptions.seasonality.iter().enumerate() {
            let period = index + 1;
            decay_factor = checked(decay_factor.checked_mul(retention), "decay factor")?;
            discount_factor = checked(discount_factor.checked_mul(growth), "discount factor")?;

            let cash_flow = checked(
                lifted_revenue
                    .checked_mul(*factor)
                    .and_then(|v| v.checked_mul(decay_factor)),
                "cash flow",
            )?;
            let discounted = checked(cash_flow.checked_div(discount_factor), "discounted cash flow")?;

            debug!(period, %cash_flow, %discounted, "Projected period");

            result.lifetime_value = checked(
                result.lifetime_value.checked_add(cash_flow),
                "lifetime value",
            )?;
            result.net_present_value = checked(
                result.net_present_value.checked_add(discounted),
                "net present value",
            )?;
            result.cash_flows.push(cash_flow);
            result.discounted_cash_flows.push(discounted);
        }

        debug!(
            horizon = result.horizon(),
            npv = %result.net_present_value,
            ltv = %result.lifetime_value,
            "Financial projection complete"
        );

        Ok(result)
    }
}
