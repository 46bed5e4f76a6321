//! Layered configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults for the detected environment, overridden by the
//!    plain variables each record reads (`JWT_SECRET`, `REDIS_URL`, ...)
//! 2. `config/<environment>.{toml,yaml,json}` if present
//! 3. `TOKENWARD__*` environment variables (`__` separates nesting levels)

use config::{Config, ConfigError, Environment as EnvSource, File};
use std::path::Path;
use tw_shared::{AppConfig, Environment};

pub const ENV_PREFIX: &str = "TOKENWARD";

/// Load configuration for the environment named by `ENVIRONMENT`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(Environment::from_env(), Path::new("."))
}

/// Load configuration for `environment`, resolving files under `base_dir`
pub fn load_config_from(environment: Environment, base_dir: &Path) -> Result<AppConfig, ConfigError> {
    let defaults = Config::try_from(&AppConfig::from_env_for(environment))?;
    let file = base_dir.join(environment.config_file());

    let config: AppConfig = Config::builder()
        .add_source(defaults)
        .add_source(File::with_name(&file.to_string_lossy()).required(false))
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    tracing::debug!(environment = %config.environment, file = %file.display(), "Configuration loaded");
    Ok(config)
}
