use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Simulation parameters from configuration are invalid: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    InvalidInput(#[from] core_types::CoreError),

    #[error("Cannot sample a normal distribution around {mean} with spread {std_dev}")]
    Distribution { mean: f64, std_dev: f64 },

    #[error("A calculation error occurred: {0}")]
    Calculation(String),
}
