use core_types::Verdict;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The discounted cash-flow projection of a single test arm.
///
/// This struct is the output of the `FinancialModel` and serves as the
/// data transfer object for projections throughout the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ROIResult {
    /// Sum of every period's cash flow discounted back to today.
    pub net_present_value: Decimal,
    /// Sum of the undiscounted cash flows over the horizon.
    pub lifetime_value: Decimal,
    /// Undiscounted cash flow, one entry per period, in period order.
    pub cash_flows: Vec<Decimal>,
    /// `cash_flows` after discounting, same order and length.
    pub discounted_cash_flows: Vec<Decimal>,
}

impl ROIResult {
    /// Creates an empty result to accumulate periods into.
    pub fn with_horizon(horizon: usize) -> Self {
        Self {
            net_present_value: Decimal::ZERO,
            lifetime_value: Decimal::ZERO,
            cash_flows: Vec::with_capacity(horizon),
            discounted_cash_flows: Vec::with_capacity(horizon),
        }
    }

    pub fn horizon(&self) -> usize {
        self.cash_flows.len()
    }

    /// Return on an up-front investment, as a fraction of that investment,
    /// measured against the net present value.
    ///
    /// `None` when the cost is zero or negative, since the ratio is undefined.
    pub fn roi(&self, cost: Decimal) -> Option<Decimal> {
        if cost <= Decimal::ZERO {
            return None;
        }
        (self.net_present_value - cost).checked_div(cost)
    }
}

/// Break-even hurdle and bottom line of rolling out the winning arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    // I. Revenue
    pub current_revenue: Decimal,
    pub new_revenue: Decimal,
    pub incremental_revenue: Decimal,

    // II. The Hurdle
    /// Minimum variant conversion rate that pays back the implementation cost.
    pub break_even_rate: Decimal,
    /// Relative lift over control the break-even rate represents.
    pub lift_required: Option<Decimal>, // Option<> because the control rate can be 0
    /// `false` when the break-even rate exceeds 100%.
    pub break_even_feasible: bool,
    pub meets_break_even: bool,

    // III. Bottom Line
    pub net_profit: Decimal,
    pub roi_pct: Decimal,
    pub verdict: Verdict,
}
