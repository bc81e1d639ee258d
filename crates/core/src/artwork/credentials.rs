//! Credential selection for the artwork catalog.

/// Optional catalog credentials, injected at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialConfig {
    /// Bearer token. Preferred when present.
    pub primary: Option<String>,
    /// API key sent as a query parameter.
    pub secondary: Option<String>,
}

impl CredentialConfig {
    /// Build from raw values; empty or blank strings count as absent.
    pub fn new(primary: Option<String>, secondary: Option<String>) -> Self {
        Self {
            primary: non_blank(primary),
            secondary: non_blank(secondary),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The credential actually used for one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>` header.
    Bearer(String),
    /// `api_key=<key>` query parameter.
    ApiKey(String),
}

/// Pick the credential for a lookup: the bearer token wins over the API key.
pub fn select_credential(config: &CredentialConfig) -> Option<Credential> {
    match (&config.primary, &config.secondary) {
        (Some(token), _) => Some(Credential::Bearer(token.clone())),
        (None, Some(key)) => Some(Credential::ApiKey(key.clone())),
        (None, None) => None,
    }
}
