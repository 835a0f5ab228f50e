// tests/common/mod.rs — Fake gateways shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cardpress::core::protocol::Generator;
use cardpress::core::session::MemoryStore;
use cardpress::infra::config::{CardConfig, Config};
use cardpress::infra::errors::CardpressError;
use cardpress::provider::{TextProvider, TextStream};
use cardpress::render::{Artifact, Card, CardRenderer, CardVariant};

/// Provider that streams a canned response in small chunks, no network.
pub struct CannedProvider {
    pub text: String,
}

impl CannedProvider {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl TextProvider for CannedProvider {
    fn id(&self) -> &str {
        "canned"
    }

    async fn probe(&self) -> Result<Vec<String>, CardpressError> {
        Ok(vec!["canned-model".into()])
    }

    async fn generate_stream(&self, _prompt: &str) -> Result<TextStream, CardpressError> {
        let chunks: Vec<Result<String, CardpressError>> = self
            .text
            .split_inclusive('\n')
            .map(|c| Ok(c.to_string()))
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// Provider whose backend is always down.
pub struct DownProvider;

#[async_trait]
impl TextProvider for DownProvider {
    fn id(&self) -> &str {
        "down"
    }

    async fn probe(&self) -> Result<Vec<String>, CardpressError> {
        Err(CardpressError::BackendUnavailable("connection refused".into()))
    }

    async fn generate_stream(&self, _prompt: &str) -> Result<TextStream, CardpressError> {
        Err(CardpressError::BackendUnavailable("connection refused".into()))
    }
}

/// Renderer that writes real markup/image files into a temp directory so
/// teardown behavior is observable, optionally failing on one page index.
pub struct FileRenderer {
    pub dir: PathBuf,
    pub fail_on_page: Option<usize>,
    seq: AtomicUsize,
}

impl FileRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            fail_on_page: None,
            seq: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(dir: PathBuf, page_index: usize) -> Self {
        Self {
            dir,
            fail_on_page: Some(page_index),
            seq: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CardRenderer for FileRenderer {
    async fn render(&self, card: &Card) -> Result<Artifact, CardpressError> {
        if self.fail_on_page == Some(card.page_index) {
            return Err(CardpressError::RenderFailure("injected failure".into()));
        }

        let prefix = match card.variant {
            CardVariant::Title => "title",
            CardVariant::Content => "content",
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let markup_path = self.dir.join(format!("{prefix}_{seq}.html"));
        let image_dir = self.dir.join("image");
        std::fs::create_dir_all(&image_dir).unwrap();
        let image_path = image_dir.join(format!("{}.png", card.page_index + 1));

        std::fs::write(&markup_path, format!("<html>{}</html>", card.title)).unwrap();
        std::fs::write(&image_path, b"png").unwrap();

        Ok(Artifact {
            markup_path,
            image_path,
        })
    }
}

/// Card tuned so two 70-char paragraphs fill a page.
pub fn small_card() -> CardConfig {
    CardConfig {
        max_height: 330.0,
        title_reserved: 80.0,
        hashtags_reserved: 50.0,
        ..CardConfig::default()
    }
}

pub fn test_config() -> Arc<Config> {
    Arc::new(Config {
        card: small_card(),
        ..Config::default()
    })
}

/// Canned model output: a title line plus six 70-char paragraphs, which the
/// small card paginates into exactly three pages.
pub fn six_paragraph_text() -> String {
    let mut text = String::from("✨测试标题✨\n");
    for i in 0..6 {
        let ch = char::from(b'a' + i as u8);
        text.push_str(&ch.to_string().repeat(70));
        text.push('\n');
    }
    text
}

pub fn generator(
    provider: Arc<dyn TextProvider>,
    renderer: Arc<dyn CardRenderer>,
    store: Arc<MemoryStore>,
) -> Generator {
    Generator {
        store,
        provider,
        renderer,
        config: test_config(),
    }
}
