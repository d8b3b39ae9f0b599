//! Client configuration
//!
//! The client runs in the browser, so settings are captured from the build
//! environment (`option_env!`) and resolved once into a cached [`ApiConfig`].

use std::sync::OnceLock;

use demystifier_types::{
    FollowUpContract, DEFAULT_API_BASE, SIMPLIFY_FILE_PATH, SIMPLIFY_TEXT_PATH,
};

pub const API_BASE_VAR: &str = "DEMYSTIFIER_API_BASE";
pub const FOLLOW_UP_CONTRACT_VAR: &str = "DEMYSTIFIER_FOLLOWUP_CONTRACT";
pub const FOLLOW_UP_PATH_VAR: &str = "DEMYSTIFIER_FOLLOWUP_PATH";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Canonical base URL, no trailing slash
    pub base_url: String,
    /// Payload shape the follow-up endpoint expects
    pub follow_up_contract: FollowUpContract,
    /// Follow-up endpoint path, leading slash
    pub follow_up_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let follow_up_contract = FollowUpContract::default();
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            follow_up_contract,
            follow_up_path: follow_up_contract.default_path().to_string(),
        }
    }
}

impl ApiConfig {
    /// Settings baked in when the WASM bundle was built
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                API_BASE_VAR => option_env!("DEMYSTIFIER_API_BASE"),
                FOLLOW_UP_CONTRACT_VAR => option_env!("DEMYSTIFIER_FOLLOWUP_CONTRACT"),
                FOLLOW_UP_PATH_VAR => option_env!("DEMYSTIFIER_FOLLOWUP_PATH"),
                _ => None,
            };
            value.map(ToString::to_string)
        })
    }

    /// Lenient resolution: an invalid setting is logged and replaced by its
    /// default instead of failing the whole client.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match env_base_url(&lookup) {
            Ok(Some(url)) => url,
            Ok(None) => defaults.base_url,
            Err(e) => {
                dioxus_logger::tracing::warn!("{e}; using {}", defaults.base_url);
                defaults.base_url
            }
        };

        let follow_up_contract = match env_parse::<FollowUpContract, _>(&lookup, FOLLOW_UP_CONTRACT_VAR) {
            Ok(Some(contract)) => contract,
            Ok(None) => defaults.follow_up_contract,
            Err(e) => {
                dioxus_logger::tracing::warn!("{e}; using {}", defaults.follow_up_contract);
                defaults.follow_up_contract
            }
        };

        let follow_up_path = match env_path(&lookup, FOLLOW_UP_PATH_VAR) {
            Ok(Some(path)) => path,
            Ok(None) => follow_up_contract.default_path().to_string(),
            Err(e) => {
                let path = follow_up_contract.default_path();
                dioxus_logger::tracing::warn!("{e}; using {path}");
                path.to_string()
            }
        };

        Self {
            base_url,
            follow_up_contract,
            follow_up_path,
        }
    }

    /// Strict resolution, reports the first invalid setting
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = env_base_url(&lookup)?.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let follow_up_contract =
            env_parse::<FollowUpContract, _>(&lookup, FOLLOW_UP_CONTRACT_VAR)?.unwrap_or_default();
        let follow_up_path = env_path(&lookup, FOLLOW_UP_PATH_VAR)?
            .unwrap_or_else(|| follow_up_contract.default_path().to_string());

        Ok(Self {
            base_url,
            follow_up_contract,
            follow_up_path,
        })
    }

    pub fn simplify_text_url(&self) -> String {
        format!("{}{}", self.base_url, SIMPLIFY_TEXT_PATH)
    }

    pub fn simplify_file_url(&self) -> String {
        format!("{}{}", self.base_url, SIMPLIFY_FILE_PATH)
    }

    pub fn follow_up_url(&self) -> String {
        format!("{}{}", self.base_url, self.follow_up_path)
    }
}

static API_CONFIG: OnceLock<ApiConfig> = OnceLock::new();

/// Get the cached client configuration
pub fn api_config() -> &'static ApiConfig {
    API_CONFIG.get_or_init(ApiConfig::from_build_env)
}

fn env_value<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env_value(lookup, key) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

/// Absolute http(s) URL, or an origin-relative prefix such as `/api/v1`.
fn env_base_url<F>(lookup: &F) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = env_value(lookup, API_BASE_VAR) else {
        return Ok(None);
    };

    let lower = value.to_ascii_lowercase();
    let absolute = lower.starts_with("http://") || lower.starts_with("https://");
    if !absolute && !value.starts_with('/') {
        return Err(ConfigError::Invalid {
            key: API_BASE_VAR,
            value,
            reason: "expected an http(s) URL or a path starting with '/'".to_string(),
        });
    }

    let trimmed = value.trim_end_matches('/');
    if absolute && trimmed.split("://").nth(1).map_or(true, str::is_empty) {
        return Err(ConfigError::Invalid {
            key: API_BASE_VAR,
            value,
            reason: "missing host".to_string(),
        });
    }

    Ok(Some(trimmed.to_string()))
}

fn env_path<F>(lookup: &F, key: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = env_value(lookup, key) else {
        return Ok(None);
    };

    if value.contains("://") || value.contains(char::is_whitespace) {
        return Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected a path such as /query".to_string(),
        });
    }

    let path = value.trim_end_matches('/');
    if path.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: "path is empty".to_string(),
        });
    }

    if path.starts_with('/') {
        Ok(Some(path.to_string()))
    } else {
        Ok(Some(format!("/{path}")))
    }
}
