use crate::error::{checked, AnalyticsError};
use core_types::{CoreError, ProductTier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-plan breakdown behind the blended figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEconomics {
    pub name: String,
    /// Normalized share of sales, summing to 1 across tiers.
    pub weight: Decimal,
    /// Year one price plus the expected year two renewal.
    pub ltv: Decimal,
    /// Renewal probability actually used for this tier (fraction).
    pub retention: Decimal,
}

/// The value of one average sale given the observed product mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEconomics {
    pub blended_ltv: Decimal,
    /// Mix-weighted renewal probability (fraction).
    pub effective_retention: Decimal,
    pub avg_year1_price: Decimal,
    pub avg_year2_price: Decimal,
    pub tiers: Vec<TierEconomics>,
}

impl UnitEconomics {
    /// Weights every tier by its share of sales and blends their two-year value.
    ///
    /// `default_retention` is a fraction in [0, 1] and applies to tiers without
    /// their own retention rate.
    pub fn from_products(
        products: &[ProductTier],
        default_retention: Decimal,
    ) -> Result<Self, AnalyticsError> {
        if default_retention < Decimal::ZERO || default_retention > Decimal::ONE {
            return Err(CoreError::invalid(
                "default_retention",
                format!("{} is outside [0, 1]", default_retention),
            )
            .into());
        }
        for product in products {
            product.validate()?;
        }

        let total_mix = checked(
            products
                .iter()
                .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(p.mix_pct)),
            "total mix",
        )?;
        if total_mix.is_zero() {
            return Err(CoreError::invalid("mix_pct", "the product mix sums to zero").into());
        }

        let mut economics = UnitEconomics {
            blended_ltv: Decimal::ZERO,
            effective_retention: Decimal::ZERO,
            avg_year1_price: Decimal::ZERO,
            avg_year2_price: Decimal::ZERO,
            tiers: Vec::with_capacity(products.len()),
        };

        for product in products {
            let weight = checked(product.mix_pct.checked_div(total_mix), "mix weight")?;
            let retention = product
                .retention_pct
                .map(|pct| pct / Decimal::ONE_HUNDRED)
                .unwrap_or(default_retention);
            let ltv = checked(
                product
                    .year2_price
                    .checked_mul(retention)
                    .and_then(|renewal| product.year1_price.checked_add(renewal)),
                "tier LTV",
            )?;

            economics.blended_ltv = accumulate(economics.blended_ltv, ltv, weight, "blended LTV")?;
            economics.effective_retention = accumulate(
                economics.effective_retention,
                retention,
                weight,
                "effective retention",
            )?;
            economics.avg_year1_price =
                accumulate(economics.avg_year1_price, product.year1_price, weight, "year 1 price")?;
            economics.avg_year2_price =
                accumulate(economics.avg_year2_price, product.year2_price, weight, "year 2 price")?;
            economics.tiers.push(TierEconomics {
                name: product.name.clone(),
                weight,
                ltv,
                retention,
            });
        }

        debug!(
            tiers = economics.tiers.len(),
            blended_ltv = %economics.blended_ltv,
            effective_retention = %economics.effective_retention,
            "Blended unit economics"
        );

        Ok(economics)
    }
}

/// `total + value * weight`, failing instead of overflowing.
fn accumulate(
    total: Decimal,
    value: Decimal,
    weight: Decimal,
    metric: &str,
) -> Result<Decimal, AnalyticsError> {
    checked(
        value.checked_mul(weight).and_then(|share| total.checked_add(share)),
        metric,
    )
}

/// Revenue produced by `traffic` visitors converting at `conversion_rate`, each
/// worth `value_per_conversion`.
pub fn baseline_revenue(
    traffic: Decimal,
    conversion_rate: Decimal,
    value_per_conversion: Decimal,
) -> Result<Decimal, AnalyticsError> {
    checked(
        traffic
            .checked_mul(conversion_rate)
            .and_then(|conversions| conversions.checked_mul(value_per_conversion)),
        "baseline revenue",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tier(name: &str, y1: Decimal, y2: Decimal, mix: Decimal, ret: Option<Decimal>) -> ProductTier {
        ProductTier {
            name: name.to_string(),
            year1_price: y1,
            year2_price: y2,
            mix_pct: mix,
            retention_pct: ret,
        }
    }

    #[test]
    fn per_tier_retention_overrides_the_default() {
        let products = vec![
            tier("Basic Cover", dec!(150), dec!(175), dec!(50), Some(dec!(75))),
            tier("Gold Cover", dec!(300), dec!(350), dec!(30), Some(dec!(85))),
            tier("Platinum Cover", dec!(500), dec!(550), dec!(20), Some(dec!(95))),
        ];
        let ue = UnitEconomics::from_products(&products, dec!(0.85)).unwrap();

        // 0.5*(150+131.25) + 0.3*(300+297.5) + 0.2*(500+522.5)
        assert_eq!(ue.blended_ltv, dec!(524.375));
        // 0.5*0.75 + 0.3*0.85 + 0.2*0.95
        assert_eq!(ue.effective_retention, dec!(0.82));
        assert_eq!(ue.avg_year1_price, dec!(265));
        assert_eq!(ue.avg_year2_price, dec!(302.5));
    }

    #[test]
    fn default_retention_fills_gaps() {
        let products = vec![tier("Basic Cover", dec!(100), dec!(200), dec!(1), None)];
        let ue = UnitEconomics::from_products(&products, dec!(0.5)).unwrap();
        assert_eq!(ue.blended_ltv, dec!(200));
        assert_eq!(ue.tiers[0].retention, dec!(0.5));
    }

    #[test]
    fn mix_weights_are_normalized() {
        let products = vec![
            tier("A", dec!(100), Decimal::ZERO, dec!(1), None),
            tier("B", dec!(300), Decimal::ZERO, dec!(3), None),
        ];
        let ue = UnitEconomics::from_products(&products, dec!(0.85)).unwrap();
        assert_eq!(ue.tiers[0].weight, dec!(0.25));
        assert_eq!(ue.blended_ltv, dec!(250));
    }

    #[test]
    fn empty_mix_is_rejected() {
        let products = vec![tier("A", dec!(100), dec!(100), Decimal::ZERO, None)];
        let err = UnitEconomics::from_products(&products, dec!(0.85)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(UnitEconomics::from_products(&[], dec!(0.85)).is_err());
    }

    #[test]
    fn baseline_revenue_is_traffic_times_rate_times_value() {
        assert_eq!(
            baseline_revenue(dec!(10000), dec!(0.02), dec!(500)).unwrap(),
            dec!(100000)
        );
        assert!(matches!(
            baseline_revenue(Decimal::MAX, Decimal::ONE, dec!(2)),
            Err(AnalyticsError::Calculation(_))
        ));
    }

    #[test]
    fn extreme_prices_report_an_overflow() {
        let products = vec![tier("Max Cover", Decimal::MAX, Decimal::MAX, dec!(1), None)];
        let err = UnitEconomics::from_products(&products, dec!(0.85)).unwrap_err();
        assert!(matches!(err, AnalyticsError::Calculation(_)));
    }
}
