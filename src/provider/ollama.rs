// src/provider/ollama.rs — Ollama local model gateway

use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;

use super::{TextProvider, TextStream};
use crate::infra::config::GeneratorConfig;
use crate::infra::errors::CardpressError;

pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    fn request_error(&self, e: reqwest::Error) -> CardpressError {
        if e.is_timeout() {
            CardpressError::GenerationTimeout(self.timeout_secs)
        } else {
            CardpressError::BackendUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn probe(&self) -> Result<Vec<String>, CardpressError> {
        let resp = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .map_err(|e| CardpressError::BackendUnavailable(e.to_string()))?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CardpressError::BackendUnavailable(format!("invalid response: {e}")))?;

        let models: Vec<String> = body["models"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
            .collect();

        if !models.iter().any(|m| m == &self.model) {
            tracing::warn!("model '{}' not present on the backend", self.model);
        }
        Ok(models)
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, CardpressError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": true,
            "options": {
                "temperature": self.temperature,
                "num_predict": self.max_tokens,
            },
        });

        let timeout_secs = self.timeout_secs;
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(Duration::from_secs(timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CardpressError::BackendUnavailable(format!(
                "HTTP error: {error_body}"
            )));
        }

        // Ollama streams NDJSON: one {"response":"...","done":false} object
        // per line, the final line carries "done":true.
        let byte_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            let mut byte_stream = std::pin::pin!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        yield Err(if e.is_timeout() {
                            CardpressError::GenerationTimeout(timeout_secs)
                        } else {
                            CardpressError::BackendUnavailable(format!("stream read error: {e}"))
                        });
                        break;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(newline_pos) = buffer.find('\n') {
                    let line = buffer[..newline_pos].trim().to_string();
                    buffer = buffer[newline_pos + 1..].to_string();

                    if line.is_empty() {
                        continue;
                    }

                    let parsed: serde_json::Value = match serde_json::from_str(&line) {
                        Ok(v) => v,
                        Err(e) => {
                            tracing::warn!("skipping malformed NDJSON line: {e}");
                            continue;
                        }
                    };

                    if let Some(message) = parsed["error"].as_str() {
                        yield Err(CardpressError::BackendUnavailable(format!(
                            "backend error: {message}"
                        )));
                        break;
                    }

                    if let Some(text) = parsed["response"].as_str() {
                        if !text.is_empty() {
                            yield Ok(text.to_string());
                        }
                    }

                    if parsed["done"].as_bool().unwrap_or(false) {
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
