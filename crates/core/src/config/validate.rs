use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Base URLs are absolute http(s) URLs
/// - Timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_url("recommender.base_url", &config.recommender.base_url)?;
    check_url("artwork.base_url", &config.artwork.base_url)?;
    check_url("artwork.image_base_url", &config.artwork.image_base_url)?;

    if config.recommender.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "recommender.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.artwork.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "artwork.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.artwork.language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "artwork.language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            field, value
        )))
    }
}
