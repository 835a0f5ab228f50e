// src/provider/mod.rs — Text generation gateway

pub mod ollama;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::infra::errors::CardpressError;

pub use ollama::OllamaProvider;

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, CardpressError>> + Send>>;

/// Black-box text service: prompt in, accumulated text out.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Check the backend is reachable; returns the models it advertises.
    async fn probe(&self) -> Result<Vec<String>, CardpressError>;

    /// Stream of raw text chunks for one prompt.
    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, CardpressError>;

    /// Full generated text: the chunk stream folded into one string.
    /// Blank output is a failure, not an empty post.
    async fn generate(&self, prompt: &str) -> Result<String, CardpressError> {
        use futures::StreamExt;

        let mut stream = self.generate_stream(prompt).await?;
        let mut out = String::new();
        while let Some(chunk) = stream.next().await {
            out.push_str(&chunk?);
        }
        if out.trim().is_empty() {
            return Err(CardpressError::EmptyGeneration);
        }
        Ok(out)
    }
}
