use crate::error::ConfigError;
use rust_decimal::Decimal;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Campaign, Config, Conversion, Projection, Simulation};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Prefix for environment overrides, e.g. `IMPACT__CAMPAIGN__COST=7500`.
const ENV_PREFIX: &str = "IMPACT";

/// Loads the application configuration from the `config.toml` file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Loads and validates the configuration from `path`.
///
/// It reads the TOML file, layers `IMPACT__*` environment variables on top,
/// deserializes the result into our strongly-typed `Config` struct and checks
/// every value is in range.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        products = config.products.len(),
        horizon = config.projection.seasonality.len(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Parses a configuration held in memory. Used by tests and embedding callers.
pub fn load_config_str(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Checks the values a TOML schema cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let campaign = &config.campaign;
    if campaign.traffic < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "campaign.traffic must not be negative".to_string(),
        ));
    }
    if campaign.cost < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "campaign.cost must not be negative".to_string(),
        ));
    }
    if campaign.default_retention_pct < Decimal::ZERO
        || campaign.default_retention_pct > Decimal::ONE_HUNDRED
    {
        return Err(ConfigError::ValidationError(
            "campaign.default_retention_pct must be between 0 and 100".to_string(),
        ));
    }

    for (name, rate) in [
        ("conversion.control_rate", config.conversion.control_rate),
        ("conversion.variant_rate", config.conversion.variant_rate),
    ] {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a fraction between 0 and 1, got {}",
                name, rate
            )));
        }
    }

    if config.products.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [[products]] entry is required".to_string(),
        ));
    }
    for product in &config.products {
        product
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }

    if config.projection.seasonality.is_empty() {
        return Err(ConfigError::ValidationError(
            "projection.seasonality needs at least one period".to_string(),
        ));
    }
    if config.projection.discount_rate < Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "projection.discount_rate must not be negative, got {}",
            config.projection.discount_rate
        )));
    }
    if config.projection.decay_rate < Decimal::ZERO || config.projection.decay_rate > Decimal::ONE {
        return Err(ConfigError::ValidationError(format!(
            "projection.decay_rate must be between 0 and 1, got {}",
            config.projection.decay_rate
        )));
    }

    if config.simulation.runs == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.runs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
