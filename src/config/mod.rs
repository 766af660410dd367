mod settings;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    LoggingSettings, PartialSettings, ServerSettings, Settings, StorageSettings,
};

/// Prefix of the environment variables read by `load_config`,
/// e.g. `SPLITSUB_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "SPLITSUB";

/// Loads the configuration from `config/default` and `SPLITSUB_*` environment
/// variables, then merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as `load_config` with an explicit base file name (extension optional).
pub fn load_config_from(file: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merged(partial))
}
