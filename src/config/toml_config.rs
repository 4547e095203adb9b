use crate::config::{BackendConfig, ANON_KEY_VARS, URL_VARS};
use crate::utils::error::{BackendError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BOOKINGS_TABLE: &str = "bookings";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: BackendSection,
    pub bookings: Option<BookingsSection>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BackendSection {
    pub url: String,
    pub anon_key: String,
    pub schema: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for BackendSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSection")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsSection {
    pub table: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BackendError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BackendError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_URL})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_regex()?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 轉成 [`BackendConfig`]；未解析的 `${VAR}` 視同未設定
    pub fn backend_config(&self) -> Result<BackendConfig> {
        let re = placeholder_regex()?;
        let url = resolved(&re, &self.backend.url)
            .ok_or_else(|| BackendError::missing(URL_VARS[0]))?;
        let anon_key = resolved(&re, &self.backend.anon_key)
            .ok_or_else(|| BackendError::missing(ANON_KEY_VARS[0]))?;

        let config = BackendConfig {
            url,
            anon_key,
            schema: self.backend.schema.clone(),
            timeout_seconds: self.backend.timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn bookings_table(&self) -> &str {
        self.bookings
            .as_ref()
            .and_then(|b| b.table.as_deref())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_BOOKINGS_TABLE)
    }
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| BackendError::ConfigValidation {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })
}

/// 任何位置殘留 `${VAR}` 都視同未設定
fn resolved(re: &Regex, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || re.is_match(value) {
        None
    } else {
        Some(value.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.backend_config().map(|_| ())
    }
}
