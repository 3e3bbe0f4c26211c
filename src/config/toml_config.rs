use crate::utils::error::{IndexerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "1hping-indexbot/1.0 (+https://app.1hping.com)";
pub const DEFAULT_API_ENDPOINT: &str =
    "https://app.1hping.com/external/api/campaign/create?culture=vi-VN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub crawler: CrawlerConfig,
    pub api: ApiConfig,
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub max_depth: usize,
    /// 同一層內同時抓取的 sitemap 數量上限
    pub level_concurrency: usize,
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: 60,
            max_depth: 6,
            level_concurrency: 8,
            accept_invalid_certs: false,
        }
    }
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub batch_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
            api_key: String::new(),
            timeout_secs: 120,
            batch_size: 2000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub max_concurrent_domains: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_domains: 3,
        }
    }
}

impl IndexerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IndexerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| IndexerError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 只用環境變數建立配置 (沒有設定檔時)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Environment variables take precedence over file and default values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("INDEXER_API_KEY") {
            self.api.api_key = key.trim().to_string();
        }
        if let Ok(endpoint) = std::env::var("INDEXER_API_URL") {
            self.api.endpoint = endpoint.trim().to_string();
        }
        if let Ok(agent) = std::env::var("CRAWLER_UA") {
            self.crawler.user_agent = agent.trim().to_string();
        }
        if let Some(size) = std::env::var("BATCH_SIZE")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.api.batch_size = size;
        }
        if let Ok(skip) = std::env::var("SKIP_SSL_VERIFY") {
            self.crawler.accept_invalid_certs = skip.trim().eq_ignore_ascii_case("true");
        }
    }

    /// 替換環境變數 (例如 ${INDEXER_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    /// Extra check for commands that talk to the indexing API.
    pub fn validate_for_submission(&self) -> Result<()> {
        self.validate()?;
        if self.api.api_key.trim().is_empty() || self.api.api_key.starts_with("${") {
            return Err(IndexerError::MissingConfigError {
                field: "api.api_key".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for IndexerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("crawler.user_agent", &self.crawler.user_agent)?;
        validation::validate_range(
            "crawler.fetch_timeout_secs",
            self.crawler.fetch_timeout_secs,
            1,
            3600,
        )?;
        validation::validate_positive_number("crawler.max_depth", self.crawler.max_depth, 1)?;
        validation::validate_positive_number(
            "crawler.level_concurrency",
            self.crawler.level_concurrency,
            1,
        )?;

        validation::validate_url("api.endpoint", &self.api.endpoint)?;
        validation::validate_range("api.timeout_secs", self.api.timeout_secs, 1, 3600)?;
        validation::validate_positive_number("api.batch_size", self.api.batch_size, 1)?;

        validation::validate_positive_number(
            "orchestrator.max_concurrent_domains",
            self.orchestrator.max_concurrent_domains,
            1,
        )?;

        Ok(())
    }
}
