//! Online translation through an OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;

use super::{Provider, ProviderError, TranslationRequest, sse};
use crate::config::OnlineSettings;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a translator. Translate the following text from {source_language} to {target_language}. \
     Output only the translated text without any explanations. \
     Keep placeholders, escape sequences, markup and URLs exactly as they are.";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(request: &TranslationRequest) -> String {
    // {source_language}/{target_language} are placeholders for string replacement, not format arguments
    SYSTEM_PROMPT_TEMPLATE
        .replace("{source_language}", request.source_language.name())
        .replace("{target_language}", request.target_language.name())
}

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug)]
pub struct OnlineProvider {
    client: Client,
    name: String,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OnlineProvider {
    pub fn new(settings: &OnlineSettings) -> Self {
        Self {
            client: Client::new(),
            name: settings.provider_name.clone(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for OnlineProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let url = self.completions_url();

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Owned(build_system_prompt(request)),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(&request.source_text),
                },
            ],
            stream: true,
        };

        let mut http_request = self.client.post(&url).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request
            .send()
            .await
            .map_err(|source| ProviderError::Connection {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let mut chunks = std::pin::pin!(sse::text_chunks(response.bytes_stream()));
        let mut translated = String::new();
        while let Some(chunk) = chunks.next().await {
            translated.push_str(&chunk?);
        }

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(translated.to_string())
    }
}
