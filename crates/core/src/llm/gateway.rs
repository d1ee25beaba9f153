use crate::config::Settings;
use crate::llm::chat::ChatCompletionsClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::ProviderClient;
use std::sync::Arc;

/// Returned when every configured provider fails. Submissions still succeed
/// with this text; generation never blocks a review.
pub const FALLBACK_TEXT: &str = "Thank you for your review. We appreciate your feedback!";

/// Ordered fallback chain over the configured providers. `generate` has no
/// error path: the first successful completion wins, and exhaustion yields
/// [`FALLBACK_TEXT`].
pub struct GenerationGateway {
    chain: Vec<Arc<dyn ProviderClient>>,
}

impl GenerationGateway {
    /// Chain layout: local-primary mode uses only Ollama; otherwise the
    /// first remote with a credential (Grok before OpenRouter) leads and
    /// Ollama backs it, since the local model needs no credential.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut chain: Vec<Arc<dyn ProviderClient>> = Vec::new();

        if settings.ollama_is_primary() {
            chain.push(Arc::new(OllamaClient::from_settings(settings)?));
        } else {
            if settings.has_grok_key() {
                chain.push(Arc::new(ChatCompletionsClient::grok_from_settings(
                    settings,
                )?));
            } else if settings.has_openrouter_key() {
                chain.push(Arc::new(ChatCompletionsClient::openrouter_from_settings(
                    settings,
                )?));
            }
            chain.push(Arc::new(OllamaClient::from_settings(settings)?));
        }

        Ok(Self { chain })
    }

    pub fn from_providers(chain: Vec<Arc<dyn ProviderClient>>) -> Self {
        Self { chain }
    }

    pub async fn generate(&self, prompt: &str) -> String {
        for client in &self.chain {
            match client.complete(prompt).await {
                Ok(text) => {
                    tracing::debug!(provider = client.provider().name(), "completion succeeded");
                    return text;
                }
                Err(err) => {
                    tracing::warn!(
                        provider = client.provider().name(),
                        error = %err,
                        "provider call failed; falling through"
                    );
                }
            }
        }

        tracing::warn!("all providers failed; returning canned acknowledgment");
        FALLBACK_TEXT.to_string()
    }
}
