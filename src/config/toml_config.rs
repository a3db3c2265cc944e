use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPERJOB_API_KEY_ENV: &str = "SUPERJOB_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub headhunter: HeadHunterConfig,
    pub superjob: SuperJobConfig,
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadHunterConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub per_page: usize,
    /// Region id; `None` searches everywhere.
    pub area: Option<String>,
    pub user_agent: String,
}

impl Default for HeadHunterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.hh.ru/vacancies/".to_string(),
            per_page: 100,
            area: Some("1".to_string()),
            user_agent: concat!("vacancy-etl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperJobConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub count: usize,
    /// Town id; `None` searches everywhere.
    pub town: Option<u32>,
    /// Sent as `X-Api-App-Id`. Falls back to `SUPERJOB_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for SuperJobConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.superjob.ru/2.0/vacancies/".to_string(),
            count: 20,
            town: Some(4),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound on pages requested from each board.
    pub pages_count: usize,
    /// Default `n` for top, recent and random views.
    pub sample_size: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pages_count: 10,
            sample_size: 3,
        }
    }
}

impl AppConfig {
    /// Read and parse a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Defaults plus environment fallbacks, for runs without a config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_fallbacks();
        config
    }

    /// Replace `${VAR}` placeholders; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn apply_env_fallbacks(&mut self) {
        let unresolved = self
            .superjob
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty() || key.starts_with("${"));
        if unresolved {
            self.superjob.api_key = None;
        }
        if self.superjob.api_key.is_none() {
            self.superjob.api_key = std::env::var(SUPERJOB_API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if self.headhunter.enabled {
            validate_url("headhunter.endpoint", &self.headhunter.endpoint)?;
            validate_positive_number("headhunter.per_page", self.headhunter.per_page, 1)?;
            validate_non_empty_string("headhunter.user_agent", &self.headhunter.user_agent)?;
        }
        if self.superjob.enabled {
            validate_url("superjob.endpoint", &self.superjob.endpoint)?;
            validate_positive_number("superjob.count", self.superjob.count, 1)?;
        }
        validate_path("storage.data_dir", &self.storage.data_dir)?;
        validate_positive_number("fetch.pages_count", self.fetch.pages_count, 1)?;
        validate_positive_number("fetch.sample_size", self.fetch.sample_size, 1)?;
        Ok(())
    }
}
