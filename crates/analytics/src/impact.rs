use crate::error::{checked, AnalyticsError};
use crate::report::ImpactReport;
use core_types::{CoreError, Verdict};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What is at stake when rolling out the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactInputs {
    /// Visitors exposed to the strategy.
    pub traffic: Decimal,
    /// Total cost of implementing the strategy.
    pub cost: Decimal,
    /// Conversion rate of the current strategy (fraction).
    pub control_rate: Decimal,
    /// Conversion rate the variant achieved (fraction).
    pub variant_rate: Decimal,
    /// Value of one sale, typically `UnitEconomics::blended_ltv`.
    pub blended_ltv: Decimal,
}

impl ImpactInputs {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.traffic < Decimal::ZERO {
            return Err(CoreError::invalid("traffic", "must not be negative"));
        }
        if self.cost < Decimal::ZERO {
            return Err(CoreError::invalid("cost", "must not be negative"));
        }
        if self.blended_ltv < Decimal::ZERO {
            return Err(CoreError::invalid("blended_ltv", "must not be negative"));
        }
        for (field, rate) in [("control_rate", self.control_rate), ("variant_rate", self.variant_rate)] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(CoreError::invalid(field, format!("{} is outside [0, 1]", rate)));
            }
        }
        Ok(())
    }
}

/// Works out the break-even hurdle and the bottom line of a rollout.
pub fn analyze_impact(inputs: &ImpactInputs) -> Result<ImpactReport, AnalyticsError> {
    inputs.validate()?;

    // --- 1. Revenue under each strategy ---
    let revenue_per_rate_point = checked(
        inputs.traffic.checked_mul(inputs.blended_ltv),
        "revenue per conversion point",
    )?;
    let current_revenue = checked(
        revenue_per_rate_point.checked_mul(inputs.control_rate),
        "current revenue",
    )?;
    let new_revenue = checked(
        revenue_per_rate_point.checked_mul(inputs.variant_rate),
        "new revenue",
    )?;

    // --- 2. The Hurdle ---
    let break_even_rate = if revenue_per_rate_point > Decimal::ZERO {
        checked(
            current_revenue
                .checked_add(inputs.cost)
                .and_then(|target| target.checked_div(revenue_per_rate_point)),
            "break-even rate",
        )?
    } else {
        Decimal::ZERO
    };
    let lift_required = if inputs.control_rate.is_zero() {
        None
    } else {
        Some(checked(
            (break_even_rate - inputs.control_rate).checked_div(inputs.control_rate),
            "lift required",
        )?)
    };
    let break_even_feasible = break_even_rate <= Decimal::ONE;
    if !break_even_feasible {
        warn!(%break_even_rate, "Cost is too high to ever break even");
    }

    // --- 3. Bottom Line ---
    // Both revenues are non-negative, so only the cost subtraction can underflow.
    let incremental_revenue = new_revenue - current_revenue;
    let net_profit = checked(incremental_revenue.checked_sub(inputs.cost), "net profit")?;
    let roi_pct = if inputs.cost > Decimal::ZERO {
        checked(
            net_profit
                .checked_div(inputs.cost)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
            "ROI",
        )?
    } else {
        Decimal::ZERO
    };
    let verdict = if net_profit > Decimal::ZERO {
        Verdict::GreenLight
    } else {
        Verdict::Caution
    };

    debug!(%incremental_revenue, %net_profit, %roi_pct, ?verdict, "Impact analysis complete");

    Ok(ImpactReport {
        current_revenue,
        new_revenue,
        incremental_revenue,
        break_even_rate,
        lift_required,
        break_even_feasible,
        meets_break_even: inputs.variant_rate >= break_even_rate,
        net_profit,
        roi_pct,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs() -> ImpactInputs {
        ImpactInputs {
            traffic: dec!(10000),
            cost: dec!(5000),
            control_rate: dec!(0.02),
            variant_rate: dec!(0.023),
            blended_ltv: dec!(500),
        }
    }

    #[test]
    fn profitable_rollout_gets_the_green_light() {
        let report = analyze_impact(&inputs()).unwrap();

        assert_eq!(report.current_revenue, dec!(100000));
        assert_eq!(report.new_revenue, dec!(115000));
        assert_eq!(report.incremental_revenue, dec!(15000));
        assert_eq!(report.net_profit, dec!(10000));
        assert_eq!(report.roi_pct, dec!(200));
        assert_eq!(report.verdict, Verdict::GreenLight);

        // (100000 + 5000) / (10000 * 500)
        assert_eq!(report.break_even_rate, dec!(0.021));
        assert_eq!(report.lift_required, Some(dec!(0.05)));
        assert!(report.break_even_feasible);
        assert!(report.meets_break_even);
    }

    #[test]
    fn missing_the_hurdle_is_a_caution() {
        let mut i = inputs();
        i.variant_rate = dec!(0.0205);
        let report = analyze_impact(&i).unwrap();

        assert_eq!(report.net_profit, dec!(-2500));
        assert_eq!(report.verdict, Verdict::Caution);
        assert!(!report.meets_break_even);
    }

    #[test]
    fn free_rollouts_report_zero_roi() {
        let mut i = inputs();
        i.cost = Decimal::ZERO;
        let report = analyze_impact(&i).unwrap();
        assert_eq!(report.roi_pct, Decimal::ZERO);
        assert_eq!(report.verdict, Verdict::GreenLight);
    }

    #[test]
    fn unreachable_break_even_is_flagged() {
        let mut i = inputs();
        i.cost = dec!(10000000);
        let report = analyze_impact(&i).unwrap();
        assert!(!report.break_even_feasible);
    }

    #[test]
    fn zero_control_rate_has_no_relative_lift() {
        let mut i = inputs();
        i.control_rate = Decimal::ZERO;
        assert_eq!(analyze_impact(&i).unwrap().lift_required, None);
    }

    #[test]
    fn huge_stakes_report_an_overflow() {
        let mut i = inputs();
        i.traffic = Decimal::from_i128_with_scale(10i128.pow(21), 0);
        i.blended_ltv = dec!(1000000000);
        let err = analyze_impact(&i).unwrap_err();
        assert!(matches!(err, AnalyticsError::Calculation(_)));
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let mut i = inputs();
        i.variant_rate = dec!(1.5);
        assert!(analyze_impact(&i).unwrap_err().is_invalid_input());
    }
}
