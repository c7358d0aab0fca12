use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{
    types::{Config, ConfigOverrides},
    ConfigError,
};

/// Prefix of environment variables that override config values.
/// Nested keys are separated by `__`, e.g. `LUMIX_DUMP_DISCOVERY__SCAN_TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "LUMIX_DUMP_";

/// Table that config files written for older releases keep their keys in.
pub const LEGACY_SECTION: &str = "lumix-upnp-dump";

/// Load configuration: file, then environment, then command line overrides.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    extract(path, overrides, ENV_PREFIX)
}

fn extract(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    env_prefix: &str,
) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let file = Figment::from(Toml::file(path));
        figment = figment
            .merge(file.clone())
            .merge(file.focus(LEGACY_SECTION));
    }

    figment
        .merge(Env::prefixed(env_prefix).split("__"))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
