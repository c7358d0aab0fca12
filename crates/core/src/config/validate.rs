use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - An output directory is set
/// - Scan timeout and buffer size are not 0
/// - The completion command is not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "output_dir is required (set it in the config file or with -o/--output-dir)"
                .to_string(),
        ));
    }

    if config.discovery.scan_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "discovery.scan_timeout_ms cannot be 0".to_string(),
        ));
    }

    if config.downloader.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "downloader.buffer_size cannot be 0".to_string(),
        ));
    }

    if let Some(command) = &config.command_after_finish {
        if command.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "command_after_finish cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}
