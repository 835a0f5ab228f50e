// src/render/mod.rs — Render gateway: structured card content → image artifact

pub mod chromium;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::infra::errors::CardpressError;

pub use chromium::ChromiumRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVariant {
    Title,
    Content,
}

/// One card's worth of content, ready for the template.
#[derive(Debug, Clone)]
pub struct Card {
    pub variant: CardVariant,
    pub title: String,
    pub body: String,
    pub hashtags: Vec<String>,
    /// Position in the post; image filenames are `page_index + 1`.
    pub page_index: usize,
}

impl Card {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            variant: CardVariant::Title,
            title: title.into(),
            body: String::new(),
            hashtags: Vec::new(),
            page_index: 0,
        }
    }

    pub fn content(
        title: impl Into<String>,
        body: impl Into<String>,
        hashtags: Vec<String>,
        page_index: usize,
    ) -> Self {
        Self {
            variant: CardVariant::Content,
            title: title.into(),
            body: body.into(),
            hashtags,
            page_index,
        }
    }
}

/// Paths produced for one rendered card. The markup file is intermediate
/// and torn down with the session; the image is the deliverable.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub markup_path: PathBuf,
    pub image_path: PathBuf,
}

#[async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render(&self, card: &Card) -> Result<Artifact, CardpressError>;
}
