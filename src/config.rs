use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Custom,
}

fn default_database_url() -> String {
    "sqlite:gsync.db?mode=rwc".to_string()
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_query() -> String {
    crate::sync::DEFAULT_QUERY.to_string()
}

fn default_max_results() -> u32 {
    crate::sync::DEFAULT_MAX_RESULTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            credentials_path: default_credentials_path(),
            sync: SyncConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            max_results: default_max_results(),
        }
    }
}

impl LlmConfig {
    /// Configured key, or the conventional environment variable for the
    /// selected provider.
    pub fn resolved_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        match self.provider {
            LlmProvider::OpenAi => std::env::var("OPENAI_API_KEY").ok(),
            LlmProvider::Custom => std::env::var("LLM_API_KEY").ok(),
        }
    }

    pub fn resolved_model(&self) -> String {
        match (&self.model, self.provider) {
            (Some(model), _) => model.clone(),
            (None, LlmProvider::OpenAi) => "gpt-4-turbo-preview".to_string(),
            (None, LlmProvider::Custom) => String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        use std::fs;
        if let Ok(content) = fs::read_to_string("settings.toml") {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
        }
        Self::default()
    }
}
