use crate::core::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_optional_path, validate_path, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PROVIDERS_URL: &str =
    "https://ursaminor.polarisproject.org/serviceproviders/data/providers.geojson";
pub const DEFAULT_USER_AGENT: &str =
    "A function that obtains service provider details for victims and survivors of human trafficking";
pub const DEFAULT_STORE_PATH: &str = "./providers.json";

/// 本地執行用的設定檔，所有區段都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub scraper: ScraperSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub reference: ReferenceSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperSection {
    #[serde(default = "default_providers_url")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScraperSection {
    fn default() -> Self {
        Self {
            endpoint: default_providers_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSection {
    pub services_path: Option<String>,
    pub states_path: Option<String>,
}

fn default_providers_url() -> String {
    DEFAULT_PROVIDERS_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }
}

/// 替換環境變數 (例如 ${TABLE_NAME})；未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl ConfigProvider for FileConfig {
    fn providers_url(&self) -> &str {
        &self.scraper.endpoint
    }

    fn user_agent(&self) -> &str {
        &self.scraper.user_agent
    }

    fn services_path(&self) -> Option<&str> {
        self.reference.services_path.as_deref()
    }

    fn states_path(&self) -> Option<&str> {
        self.reference.states_path.as_deref()
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        validate_url("scraper.endpoint", &self.scraper.endpoint)?;
        validate_non_empty_string("scraper.user_agent", &self.scraper.user_agent)?;
        validate_path("store.path", &self.store.path)?;
        validate_optional_path("reference.services_path", self.services_path())?;
        validate_optional_path("reference.states_path", self.states_path())?;
        Ok(())
    }
}
