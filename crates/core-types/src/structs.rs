use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One arm of an A/B test, described relative to the control arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestArm {
    /// Conversion rate of the control arm, as a fraction in [0, 1].
    pub conversion_rate: Decimal,
    /// Relative improvement over control (0.20 = +20%). May be negative.
    pub lift: Decimal,
}

impl TestArm {
    pub fn new(conversion_rate: Decimal, lift: Decimal) -> Self {
        Self { conversion_rate, lift }
    }

    /// The conversion rate once the lift is applied.
    pub fn effective_conversion_rate(&self) -> Decimal {
        self.conversion_rate * (Decimal::ONE + self.lift)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.conversion_rate < Decimal::ZERO || self.conversion_rate > Decimal::ONE {
            return Err(CoreError::invalid(
                "conversion_rate",
                format!("{} is outside [0, 1]", self.conversion_rate),
            ));
        }
        // Revenue scales by `1 + lift`, so this floor holds even at zero conversion.
        if self.lift < -Decimal::ONE {
            return Err(CoreError::invalid(
                "lift",
                format!("{} is below -1 (more than a 100% drop)", self.lift),
            ));
        }
        let effective = self.effective_conversion_rate();
        if effective < Decimal::ZERO {
            return Err(CoreError::invalid(
                "lift",
                format!(
                    "lift {} drives the effective conversion rate negative ({})",
                    self.lift, effective
                ),
            ));
        }
        Ok(())
    }
}

/// The financial assumptions a projection is made under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    /// Revenue per period at the control conversion rate.
    pub baseline_revenue: Decimal,
    /// Discount rate per period (0.10 = 10%).
    pub discount_rate: Decimal,
    /// One multiplier per period. The length of this sequence is the horizon.
    pub seasonality: Vec<Decimal>,
    /// Fraction of the effect lost each period.
    #[serde(default)]
    pub decay_rate: Decimal,
}

impl FinancialAssumptions {
    pub fn horizon(&self) -> usize {
        self.seasonality.len()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.baseline_revenue < Decimal::ZERO {
            return Err(CoreError::invalid(
                "baseline_revenue",
                format!("{} must not be negative", self.baseline_revenue),
            ));
        }
        if self.discount_rate < Decimal::ZERO {
            return Err(CoreError::invalid(
                "discount_rate",
                format!("{} must not be negative", self.discount_rate),
            ));
        }
        if self.seasonality.is_empty() {
            return Err(CoreError::invalid(
                "seasonality",
                "at least one period is required",
            ));
        }
        if let Some((period, factor)) = self
            .seasonality
            .iter()
            .enumerate()
            .find(|(_, f)| **f < Decimal::ZERO)
        {
            return Err(CoreError::invalid(
                "seasonality",
                format!("factor {} for period {} is negative", factor, period + 1),
            ));
        }
        if self.decay_rate < Decimal::ZERO || self.decay_rate > Decimal::ONE {
            return Err(CoreError::invalid(
                "decay_rate",
                format!("{} is outside [0, 1]", self.decay_rate),
            ));
        }
        Ok(())
    }
}

/// An insurance plan on offer, with the share of sales it took during the test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTier {
    pub name: String,
    /// Price paid at signup.
    pub year1_price: Decimal,
    /// Price paid at renewal.
    pub year2_price: Decimal,
    /// Observed share of sales. Only relative size matters.
    pub mix_pct: Decimal,
    /// Share of customers renewing for year two (0-100). Falls back to the
    /// portfolio default when absent.
    #[serde(default)]
    pub retention_pct: Option<Decimal>,
}

impl ProductTier {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.year1_price < Decimal::ZERO || self.year2_price < Decimal::ZERO {
            return Err(CoreError::invalid(
                "price",
                format!("'{}' has a negative price", self.name),
            ));
        }
        if self.mix_pct < Decimal::ZERO {
            return Err(CoreError::invalid(
                "mix_pct",
                format!("'{}' has a negative mix share", self.name),
            ));
        }
        if let Some(retention) = self.retention_pct {
            if retention < Decimal::ZERO || retention > Decimal::ONE_HUNDRED {
                return Err(CoreError::invalid(
                    "retention_pct",
                    format!("'{}' retention {} is outside [0, 100]", self.name, retention),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assumptions() -> FinancialAssumptions {
        FinancialAssumptions {
            baseline_revenue: dec!(1000),
            discount_rate: dec!(0.10),
            seasonality: vec![dec!(1), dec!(1), dec!(1)],
            decay_rate: Decimal::ZERO,
        }
    }

    #[test]
    fn lift_of_minus_one_is_the_floor() {
        assert!(TestArm::new(dec!(0.1), dec!(-1)).validate().is_ok());
        let err = TestArm::new(dec!(0.1), dec!(-1.01)).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "lift"));
    }

    #[test]
    fn lift_floor_applies_at_zero_conversion() {
        let err = TestArm::new(Decimal::ZERO, dec!(-3)).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "lift"));
        assert!(TestArm::new(Decimal::ZERO, dec!(-1)).validate().is_ok());
    }

    #[test]
    fn conversion_rate_above_one_is_rejected() {
        assert!(TestArm::new(dec!(1.2), Decimal::ZERO).validate().is_err());
    }

    #[test]
    fn assumptions_range_checks() {
        assert!(assumptions().validate().is_ok());

        let mut a = assumptions();
        a.discount_rate = dec!(-0.01);
        assert!(a.validate().is_err());

        let mut a = assumptions();
        a.seasonality.clear();
        assert!(a.validate().is_err());

        let mut a = assumptions();
        a.decay_rate = dec!(1.5);
        assert!(a.validate().is_err());

        let mut a = assumptions();
        a.seasonality[1] = dec!(-0.5);
        assert!(a.validate().is_err());
    }

    #[test]
    fn tier_retention_must_be_a_percentage() {
        let tier = ProductTier {
            name: "Gold Cover".to_string(),
            year1_price: dec!(300),
            year2_price: dec!(350),
            mix_pct: dec!(30),
            retention_pct: Some(dec!(120)),
        };
        assert!(tier.validate().is_err());
    }
}
