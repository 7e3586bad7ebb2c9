use std::{sync::Arc, time::Duration};

use crate::{config::Config, Error, Result};

use super::provider::{AiProvider, GeminiProvider};

pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Summary service. Holds the provider, if one is configured, and the model preference list.
#[derive(Clone)]
pub struct Summarizer {
    provider: Option<Arc<dyn AiProvider>>,
    models: Arc<[String]>,
}

impl Summarizer {
    pub fn new(provider: Option<Arc<dyn AiProvider>>, models: Vec<String>) -> Self {
        Self {
            provider,
            models: models.into(),
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(None, Vec::new())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = match config.gemini_api_key() {
            Some(key) => {
                let gemini = GeminiProvider::new(
                    key,
                    config.gemini_base_url.clone(),
                    Duration::from_secs(config.ai_timeout_secs),
                )
                .map_err(|e| Error::Configuration(e.to_string()))?;
                Some(Arc::new(gemini) as Arc<dyn AiProvider>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, summaries are disabled");
                None
            }
        };

        Ok(Self::new(provider, config.ai_models.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn default_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or(DEFAULT_MODEL)
    }

    fn provider(&self) -> Result<&dyn AiProvider> {
        self.provider
            .as_deref()
            .ok_or_else(|| Error::Configuration("GEMINI_API_KEY not set. Configure it to use AI.".into()))
    }

    pub async fn available_models(&self) -> Result<Vec<String>> {
        self.provider()?
            .list_models()
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("Error listing models: {e}")))
    }

    /// Picks a model the provider currently offers. Never fails: when the listing is not
    /// available the default model is used.
    async fn pick_model(&self, provider: &dyn AiProvider) -> String {
        match provider.list_models().await {
            Ok(available) => select_model(&self.models, &available).unwrap_or_else(|| self.default_model().to_string()),
            Err(err) => {
                tracing::warn!("listing models failed, using {}: {err}", self.default_model());
                self.default_model().to_string()
            }
        }
    }

    pub async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        let provider = self.provider()?;

        let model = self.pick_model(provider).await;
        tracing::debug!(model = %model, "summarizing");

        provider
            .generate(&model, &build_prompt(title, content))
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))
    }
}

/// First preferred model that is offered (exactly or as a name suffix), otherwise the
/// first offered model that looks like a Gemini Pro model.
pub fn select_model(preferred: &[String], available: &[String]) -> Option<String> {
    preferred
        .iter()
        .find(|candidate| {
            available
                .iter()
                .any(|name| name == *candidate || name.ends_with(candidate.as_str()))
        })
        .or_else(|| {
            available.iter().find(|name| {
                let name = name.to_lowercase();
                name.contains("gemini") && name.contains("pro")
            })
        })
        .cloned()
}

pub fn build_prompt(title: &str, content: &str) -> String {
    format!("Title: {title}\nContent: {content}\nSummarize briefly.")
}
