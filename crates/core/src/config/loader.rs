use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `CINEREC_ARTWORK__BEARER_TOKEN`.
const ENV_PREFIX: &str = "CINEREC_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path)))
}

/// Load configuration from an optional file, falling back to defaults.
///
/// Environment overrides apply either way, so credentials can be supplied
/// without any config file.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => extract(Figment::from(Serialized::defaults(Config::default()))),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[recommender]
base_url = "http://127.0.0.1:8000"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.recommender.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[recommender]
timeout_secs = "soon"
"#;
        let result = load_config_from_str(toml);
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/cinerec.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[recommender]
base_url = "http://recsys:8000"

[artwork]
bearer_token = "token-from-file"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.recommender.base_url, "http://recsys:8000");
        assert_eq!(config.recommender.timeout_secs, 30);
        assert_eq!(config.artwork.bearer_token.as_deref(), Some("token-from-file"));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = tokio_test::assert_ok!(load_config_or_default(None));
        assert_eq!(config.artwork.image_base_url, "https://image.tmdb.org/t/p/w342");
    }
}
