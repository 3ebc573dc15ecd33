//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration
///
/// Identity is verified upstream; this service only maps bearer tokens to
/// actors. `static_tokens` is a comma-separated list of
/// `token:actor_id:tenant_id:email` entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub static_tokens: Option<String>,
}

/// One parsed `static_tokens` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTokenEntry {
    pub token: String,
    pub actor_id: String,
    pub tenant_id: String,
    pub email: String,
}

impl AuthConfig {
    pub fn entries(&self) -> Result<Vec<StaticTokenEntry>, ValidationError> {
        let Some(raw) = self.static_tokens.as_deref() else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| {
                let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
                match parts.as_slice() {
                    [token, actor, tenant, email]
                        if !token.is_empty() && !actor.is_empty() && !tenant.is_empty() =>
                    {
                        Ok(StaticTokenEntry {
                            token: token.to_string(),
                            actor_id: actor.to_string(),
                            tenant_id: tenant.to_string(),
                            email: email.to_string(),
                        })
                    }
                    // Only the token prefix goes into the error.
                    _ => Err(ValidationError::InvalidStaticToken(
                        entry.chars().take(4).collect::<String>() + "…",
                    )),
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.entries().map(|_| ())
    }
}
