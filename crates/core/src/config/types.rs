use serde::{Deserialize, Serialize};

use crate::artwork::CredentialConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub recommender: RecommenderConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
}

/// Recommendation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommenderConfig {
    /// Base URL the `/recommend/...` paths are resolved against
    #[serde(default = "default_recommender_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            base_url: default_recommender_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_recommender_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Poster artwork catalog (TMDB) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtworkConfig {
    /// TMDB v4 read access token, sent as `Authorization: Bearer`.
    /// Takes precedence over `api_key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    /// TMDB v3 API key, sent as the `api_key` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL (default: https://api.themoviedb.org/3)
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
    /// Prefix joined with the returned poster path
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Search locale (default: en-US)
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_key: None,
            base_url: default_tmdb_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ArtworkConfig {
    /// Credentials injected into a poster lookup.
    pub fn credentials(&self) -> CredentialConfig {
        CredentialConfig::new(self.bearer_token.clone(), self.api_key.clone())
    }
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w342".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub recommender: RecommenderConfig,
    pub artwork: SanitizedArtworkConfig,
}

/// Sanitized artwork config (credentials hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedArtworkConfig {
    pub bearer_token_configured: bool,
    pub api_key_configured: bool,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let credentials = config.artwork.credentials();
        Self {
            recommender: config.recommender.clone(),
            artwork: SanitizedArtworkConfig {
                bearer_token_configured: credentials.primary.is_some(),
                api_key_configured: credentials.secondary.is_some(),
                base_url: config.artwork.base_url.clone(),
                image_base_url: config.artwork.image_base_url.clone(),
                language: config.artwork.language.clone(),
                timeout_secs: config.artwork.timeout_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.recommender.base_url, "http://localhost:8000");
        assert_eq!(config.recommender.timeout_secs, 30);
        assert_eq!(config.artwork.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.artwork.image_base_url, "https://image.tmdb.org/t/p/w342");
        assert_eq!(config.artwork.language, "en-US");
        assert!(config.artwork.bearer_token.is_none());
        assert!(config.artwork.api_key.is_none());
    }

    #[test]
    fn test_deserialize_custom_sections() {
        let toml = r#"
[recommender]
base_url = "http://recsys.internal:9000"
timeout_secs = 5

[artwork]
api_key = "abc123"
language = "it-IT"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.recommender.base_url, "http://recsys.internal:9000");
        assert_eq!(config.recommender.timeout_secs, 5);
        assert_eq!(config.artwork.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.artwork.language, "it-IT");
        assert_eq!(config.artwork.timeout_secs, 30); // default
    }

    #[test]
    fn test_credentials_treat_empty_strings_as_absent() {
        let artwork = ArtworkConfig {
            bearer_token: Some(String::new()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let credentials = artwork.credentials();
        assert!(credentials.primary.is_none());
        assert_eq!(credentials.secondary.as_deref(), Some("key"));
    }

    #[test]
    fn test_sanitized_config_hides_credentials() {
        let config = Config {
            recommender: RecommenderConfig::default(),
            artwork: ArtworkConfig {
                bearer_token: Some("secret-token".to_string()),
                api_key: None,
                ..Default::default()
            },
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.artwork.bearer_token_configured);
        assert!(!sanitized.artwork.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }
}
