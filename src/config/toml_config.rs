use super::{DEFAULT_CONCURRENT_REQUESTS, DEFAULT_ENDPOINT, DEFAULT_OUTPUT_PATH};
use crate::domain::model::{FailurePolicy, SelectorConfig};
use crate::domain::ports::{
    ConfigProvider, DEFAULT_CSV_FILENAME, DEFAULT_JSON_FILENAME, DEFAULT_PAGE_SIZE,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_filters, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub error_handling: Option<ErrorHandlingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub cookie: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cookie: None,
            timeout_seconds: None,
            headers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    pub filters: Vec<String>,
    pub page_size: Option<u32>,
    pub concurrent_requests: Option<usize>,
    pub selectors: Option<SelectorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    pub filenames: Option<FilenameConfig>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filenames: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilenameConfig {
    pub json: Option<String>,
    pub csv: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_failure: Option<FailurePolicy>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ORDER_HISTORY_COOKIE})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("source.endpoint", &self.source.endpoint)?;

        let cookie = validate_required_field("source.cookie", &self.source.cookie)?;
        validate_non_empty_string("source.cookie", cookie)?;
        if let Some(caps) = ENV_PLACEHOLDER.captures(cookie) {
            return Err(EtlError::InvalidConfigValueError {
                field: "source.cookie".to_string(),
                value: caps[0].to_string(),
                reason: format!("Environment variable {} is not set", &caps[1]),
            });
        }

        validate_filters("extract.filters", &self.extract.filters)?;
        validate_positive_number("extract.page_size", self.page_size() as usize, 1)?;
        validate_positive_number("extract.concurrent_requests", self.concurrent_requests(), 1)?;

        validate_path("load.output_path", &self.load.output_path)?;
        validate_path("load.filenames.json", self.json_filename())?;
        validate_path("load.filenames.csv", self.csv_filename())?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn credential(&self) -> &str {
        self.source.cookie.as_deref().unwrap_or("")
    }

    fn filters(&self) -> &[String] {
        &self.extract.filters
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn concurrent_requests(&self) -> usize {
        self.extract
            .concurrent_requests
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    fn page_size(&self) -> u32 {
        self.extract.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn selectors(&self) -> SelectorConfig {
        self.extract.selectors.clone().unwrap_or_default()
    }

    fn json_filename(&self) -> &str {
        self.load
            .filenames
            .as_ref()
            .and_then(|f| f.json.as_deref())
            .unwrap_or(DEFAULT_JSON_FILENAME)
    }

    fn csv_filename(&self) -> &str {
        self.load
            .filenames
            .as_ref()
            .and_then(|f| f.csv.as_deref())
            .unwrap_or(DEFAULT_CSV_FILENAME)
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.error_handling
            .as_ref()
            .and_then(|e| e.on_failure)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
