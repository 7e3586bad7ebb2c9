use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub log_format: LogFormat,

    // ai
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,
    /// Model identifiers in preference order.
    #[serde(default = "default_ai_models")]
    pub ai_models: Vec<String>,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

pub fn default_ai_models() -> Vec<String> {
    [
        "gemini-pro",
        "models/gemini-pro",
        "gemini-1.5-pro",
        "models/gemini-1.5-pro",
        "gemini-1.0-pro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_local() -> String {
    "local".into()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }

    pub fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Api key, if one is set and not blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: default_database_url(),
            log_format: LogFormat::default(),
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            ai_timeout_secs: default_ai_timeout_secs(),
            ai_models: default_ai_models(),
            source: default_local(),
            git_commit: default_local(),
            pipeline_id: default_local(),
            version: default_local(),
        }
    }
}
