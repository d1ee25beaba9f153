use crate::config::Settings;
use crate::llm::error::ProviderCallError;
use crate::llm::{Provider, ProviderClient, PROVIDER_CALL_TIMEOUT};
use anyhow::Context;
use serde::{Deserialize, Serialize};

const DEFAULT_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_MODEL: &str = "llama3.2";

/// Client for a locally hosted Ollama endpoint. Needs no credential, so it
/// is always constructible.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let url = settings
            .ollama_url
            .clone()
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let model = settings
            .ollama_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let http = reqwest::Client::builder()
            .timeout(PROVIDER_CALL_TIMEOUT)
            .build()
            .context("failed to build ollama http client")?;

        Ok(Self { http, url, model })
    }

    fn call_error(&self, stage: &'static str, detail: String) -> ProviderCallError {
        ProviderCallError {
            provider: Provider::Ollama,
            stage,
            detail,
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for OllamaClient {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let req = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let res = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.call_error("transport", e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| self.call_error("read", e.to_string()))?;
        if !status.is_success() {
            return Err(self.call_error("http", format!("status={status}: {text}")).into());
        }

        let parsed = serde_json::from_str::<GenerateResponse>(&text)
            .map_err(|e| self.call_error("decode", format!("{e}: {text}")))?;

        let out = parsed.response.trim();
        if out.is_empty() {
            return Err(self.call_error("decode", "empty completion".to_string()).into());
        }
        Ok(out.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}
