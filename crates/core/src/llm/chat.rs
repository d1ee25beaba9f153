use crate::config::Settings;
use crate::llm::error::ProviderCallError;
use crate::llm::{Provider, ProviderClient, PROVIDER_CALL_TIMEOUT};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

const GROK_URL: &str = "https://api.x.ai/v1/chat/completions";
const GROK_MODEL: &str = "grok-beta";

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_MODEL: &str = "openai/gpt-3.5-turbo";

/// Client for the OpenAI-style chat-completions shape. Grok and OpenRouter
/// speak the same envelope (bearer auth, messages in, choices out), so one
/// client covers both; only endpoint, model, and credential differ.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    provider: Provider,
    url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn grok_from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings
            .grok_api_key
            .clone()
            .context("GROK_API_KEY is required")?;
        let url = settings
            .grok_url
            .clone()
            .unwrap_or_else(|| GROK_URL.to_string());
        Self::build(Provider::Grok, url, api_key, GROK_MODEL.to_string())
    }

    pub fn openrouter_from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings
            .openrouter_api_key
            .clone()
            .context("OPENROUTER_API_KEY is required")?;
        let url = settings
            .openrouter_url
            .clone()
            .unwrap_or_else(|| OPENROUTER_URL.to_string());
        Self::build(
            Provider::OpenRouter,
            url,
            api_key,
            OPENROUTER_MODEL.to_string(),
        )
    }

    fn build(
        provider: Provider,
        url: String,
        api_key: String,
        model: String,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_CALL_TIMEOUT)
            .build()
            .context("failed to build chat completions http client")?;

        Ok(Self {
            http,
            provider,
            url,
            api_key,
            model,
        })
    }

    fn headers(&self) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    fn call_error(&self, stage: &'static str, detail: String) -> ProviderCallError {
        ProviderCallError {
            provider: self.provider,
            stage,
            detail,
        }
    }
}

#[async_trait::async_trait]
impl ProviderClient for ChatCompletionsClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let headers = self
            .headers()
            .map_err(|e| self.call_error("auth", e.to_string()))?;
        let req = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .http
            .post(&self.url)
            .headers(headers)
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

        let parsed = serde_json::from_str::<ChatResponse>(&text)
            .map_err(|e| self.call_error("decode", format!("{e}: {text}")))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(self.call_error("decode", "no choices in response".to_string()).into());
        }
        Ok(content.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_chat_completions_wire_shape() {
        let req = ChatRequest {
            model: "grok-beta",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "model": "grok-beta",
                "messages": [{"role": "user", "content": "hello"}],
            })
        );
    }

    #[test]
    fn first_choice_content_is_extracted() {
        let v = json!({
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        });
        let parsed: ChatResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.choices[0].message.content, "first");
    }

    #[test]
    fn empty_choices_decodes_but_yields_no_content() {
        let parsed: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn grok_client_requires_api_key() {
        assert!(ChatCompletionsClient::grok_from_settings(&Settings::default()).is_err());
    }

    #[test]
    fn openrouter_client_uses_defaults() {
        let settings = Settings {
            openrouter_api_key: Some("or-key".to_string()),
            ..Default::default()
        };
        let client = ChatCompletionsClient::openrouter_from_settings(&settings).unwrap();
        assert_eq!(client.url, OPENROUTER_URL);
        assert_eq!(client.model, OPENROUTER_MODEL);
        assert_eq!(client.provider(), Provider::OpenRouter);
    }
}
