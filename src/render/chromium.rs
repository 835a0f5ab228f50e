// src/render/chromium.rs — Headless-browser card renderer
//
// Renders the embedded HTML templates, writes the markup next to the copied
// font/background assets, and screenshots the card with headless Chromium.

use chrono::Utc;
use minijinja::{context, Environment};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use super::{Artifact, Card, CardRenderer, CardVariant};
use crate::infra::config::{CardConfig, OutputConfig, RenderConfig};
use crate::infra::errors::CardpressError;

const TITLE_TEMPLATE: &str = include_str!("templates/title.html");
const CONTENT_TEMPLATE: &str = include_str!("templates/content.html");

const BROWSER_CANDIDATES: [&str; 4] = [
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

pub struct ChromiumRenderer {
    env: Environment<'static>,
    render: RenderConfig,
    card: CardConfig,
    output_dir: PathBuf,
    image_dir: PathBuf,
    browser: PathBuf,
}

impl ChromiumRenderer {
    pub fn new(
        render: &RenderConfig,
        card: &CardConfig,
        output: &OutputConfig,
    ) -> Result<Self, CardpressError> {
        let mut env = Environment::new();
        env.add_template("title", TITLE_TEMPLATE)
            .map_err(|e| CardpressError::Config(format!("title template: {e}")))?;
        env.add_template("content", CONTENT_TEMPLATE)
            .map_err(|e| CardpressError::Config(format!("content template: {e}")))?;

        let browser = match &render.browser {
            Some(path) => PathBuf::from(path),
            None => find_browser()?,
        };

        Ok(Self {
            env,
            render: render.clone(),
            card: card.clone(),
            output_dir: output.dir.clone(),
            image_dir: output.image_dir(),
            browser,
        })
    }

    /// Fonts and the background image must sit next to the markup file so
    /// its relative URLs resolve. Missing source files are fatal.
    fn stage_assets(&self) -> Result<(), CardpressError> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.image_dir)?;

        for name in self.render.required_assets() {
            let src = self.render.assets_dir.join(name);
            if !src.exists() {
                return Err(CardpressError::MissingAsset(src));
            }
            let dst = self.output_dir.join(name);
            if !dst.exists() {
                std::fs::copy(&src, &dst)?;
            }
        }
        Ok(())
    }

    fn render_markup(&self, card: &Card) -> Result<String, CardpressError> {
        let rendered = match card.variant {
            CardVariant::Title => self
                .env
                .get_template("title")
                .expect("registered in new()")
                .render(context! {
                    title => &card.title,
                    title_font => &self.render.title_font,
                    background => &self.render.background,
                    width => self.card.width,
                    height => self.card.height,
                }),
            CardVariant::Content => {
                let paragraphs: Vec<&str> = card
                    .body
                    .split("\n\n")
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect();
                self.env
                    .get_template("content")
                    .expect("registered in new()")
                    .render(context! {
                        title => &card.title,
                        paragraphs => paragraphs,
                        hashtags => card.hashtags.join(" "),
                        body_font => &self.render.body_font,
                        background => &self.render.background,
                        width => self.card.width,
                        height => self.card.height,
                        font_size => self.card.font_size,
                        line_height => self.card.line_height,
                    })
            }
        };
        rendered.map_err(|e| CardpressError::RenderFailure(format!("template: {e}")))
    }

    async fn screenshot(&self, markup: &Path, image: &Path) -> Result<(), CardpressError> {
        let markup_abs = std::fs::canonicalize(markup)?;
        let url = format!("file://{}", markup_abs.display());

        let mut cmd = tokio::process::Command::new(&self.browser);
        cmd.arg("--headless")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={},{}", self.card.width, self.card.height))
            .arg(format!("--screenshot={}", image.display()))
            .arg(&url)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped());

        let timeout = Duration::from_secs(self.render.timeout_secs);
        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| CardpressError::RenderTimeout(self.render.timeout_secs))?
            .map_err(|e| CardpressError::RenderFailure(format!("spawn browser: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CardpressError::RenderFailure(format!(
                "browser exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if !image.exists() {
            return Err(CardpressError::RenderFailure(format!(
                "browser produced no screenshot at {}",
                image.display()
            )));
        }
        Ok(())
    }
}

fn find_browser() -> Result<PathBuf, CardpressError> {
    for candidate in BROWSER_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }
    Err(CardpressError::Config(
        "no Chromium/Chrome binary found; set [render].browser".into(),
    ))
}

#[async_trait]
impl CardRenderer for ChromiumRenderer {
    async fn render(&self, card: &Card) -> Result<Artifact, CardpressError> {
        self.stage_assets()?;

        let prefix = match card.variant {
            CardVariant::Title => "title",
            CardVariant::Content => "content",
        };
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S%3f");
        let markup_path = self.output_dir.join(format!("{prefix}_{timestamp}.html"));
        // Positional image name: title card is 1.png, page k is (k+1).png.
        let image_path = self.image_dir.join(format!("{}.png", card.page_index + 1));

        let markup = self.render_markup(card)?;
        std::fs::write(&markup_path, markup)?;
        tracing::debug!("markup written to {}", markup_path.display());

        self.screenshot(&markup_path, &image_path).await?;
        tracing::info!("card image saved to {}", image_path.display());

        Ok(Artifact {
            markup_path,
            image_path,
        })
    }
}
