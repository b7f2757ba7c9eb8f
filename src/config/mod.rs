use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::AppResult;

/// 唯一需要的外部凭据
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

pub const SETTINGS_PATH: &str = "config/settings.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// 0 表示只请求一次
    pub max_retries: u32,
    /// 拼写检查时同时进行的页面请求数
    pub concurrency: usize,
    pub proxy: String,
    /// 只从环境变量读取，从不写入配置文件
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_words: usize,
    pub min_word_len: usize,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(Path::new(SETTINGS_PATH))
    }

    /// 配置文件可选，`INSIGHT__ASSISTANT__MODEL` 这类环境变量覆盖文件中的值
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("INSIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.assistant.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ::config::ConfigError::Message(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl AssistantConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.mistral.ai/v1/chat/completions".to_string(),
            model: "mistral-large-latest".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 0,
            concurrency: 1,
            proxy: String::new(),
            api_key: String::new(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_words: 15,
            min_word_len: 4,
        }
    }
}
