#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{BackendError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_required_string, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

/// 服務網址，依序查找
pub const URL_VARS: &[&str] = &["SUPABASE_URL", "VITE_SUPABASE_URL"];
/// 公開 (anon) API key，依序查找
pub const ANON_KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];
pub const SCHEMA_VAR: &str = "SUPABASE_DB_SCHEMA";
pub const TIMEOUT_VAR: &str = "SUPABASE_TIMEOUT_SECONDS";

/// Credentials and connection settings for the hosted backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub schema: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            schema: None,
            timeout_seconds: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration through `lookup`, which maps a variable name
    /// to its value. Absent and blank values are treated the same.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = first_present(&lookup, URL_VARS).ok_or_else(|| BackendError::missing(URL_VARS[0]))?;
        let anon_key = first_present(&lookup, ANON_KEY_VARS)
            .ok_or_else(|| BackendError::missing(ANON_KEY_VARS[0]))?;

        let schema = non_blank(lookup(SCHEMA_VAR));
        let timeout_seconds = match non_blank(lookup(TIMEOUT_VAR)) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                BackendError::InvalidConfigValue {
                    field: TIMEOUT_VAR.to_string(),
                    value: raw.clone(),
                    reason: format!("Not a whole number of seconds: {}", e),
                }
            })?),
            None => None,
        };

        tracing::debug!(url = %url, schema = ?schema, "Resolved backend configuration");

        Ok(Self {
            url,
            anon_key,
            schema,
            timeout_seconds,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn first_present<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .find_map(|name| non_blank(lookup(name)))
        .map(|value| value.trim().to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Validate for BackendConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        validate_required_string("anon_key", &self.anon_key)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        if let Some(schema) = &self.schema {
            if schema.trim().is_empty() {
                return Err(BackendError::InvalidConfigValue {
                    field: "schema".to_string(),
                    value: schema.clone(),
                    reason: "Schema name cannot be blank".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
