use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("Calculation error: {0}")]
    Calculation(String),
}

impl AnalyticsError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyticsError::InvalidInput(_))
    }
}

/// Turns the `None` of a checked Decimal operation into a `Calculation` error.
pub(crate) fn checked(
    value: Option<rust_decimal::Decimal>,
    metric: &str,
) -> Result<rust_decimal::Decimal, AnalyticsError> {
    value.ok_or_else(|| AnalyticsError::Calculation(format!("overflow computing {}", metric)))
}
