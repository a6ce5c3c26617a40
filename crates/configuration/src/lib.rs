use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    ComparatorConfig, Config, HeatmapConfig, LogFormat, LoggingConfig, ProviderConfig,
    ServerConfig,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `STOCKSCOPE_SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "STOCKSCOPE";

/// Loads the application configuration from a TOML file.
///
/// Values from the file can be overridden by `STOCKSCOPE_*` environment
/// variables, using `__` to descend into sections. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    finish(builder)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
