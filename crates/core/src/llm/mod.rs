use std::time::Duration;

pub mod chat;
pub mod error;
pub mod gateway;
pub mod ollama;
pub mod prompts;

/// Every provider call is bounded by this; expiry is an error, not a hang.
pub const PROVIDER_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    Grok,
    OpenRouter,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::Grok => "grok",
            Provider::OpenRouter => "openrouter",
        }
    }
}

#[async_trait::async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Send one free-text prompt to the backend and return the generated
    /// text. Any failure mode (transport, status, decode, empty completion)
    /// surfaces as [`error::ProviderCallError`].
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
