// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub card: CardConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

/// Text generation backend (Ollama).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout for one generation call.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "deepseek-r1:1.5b".into(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

/// Layout parameters of one card, used by the height estimator and paginator.
///
/// Heights are in the card's own pixel space. `max_height` is the vertical
/// budget for the content column; the title and hashtag bands are carved out
/// of it before pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub line_height: f32,
    pub paragraph_padding: f32,
    pub paragraph_margin: f32,
    pub chars_per_line: usize,
    /// Extra effective characters charged per decorative glyph.
    pub glyph_extra_weight: usize,
    pub max_height: f32,
    pub title_reserved: f32,
    pub hashtags_reserved: f32,
    /// Tags shown on the final page of a post.
    #[serde(default = "default_hashtags")]
    pub final_page_hashtags: Vec<String>,
}

fn default_hashtags() -> Vec<String> {
    vec!["#生活分享".into()]
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width: 975,
            height: 1300,
            font_size: 24.0,
            line_height: 1.4,
            paragraph_padding: 25.0,
            paragraph_margin: 15.0,
            chars_per_line: 40,
            glyph_extra_weight: 2,
            max_height: 1100.0,
            title_reserved: 80.0,
            hashtags_reserved: 50.0,
            final_page_hashtags: default_hashtags(),
        }
    }
}

impl CardConfig {
    /// Vertical space left for body paragraphs on one card.
    pub fn available_height(&self) -> f32 {
        self.max_height - self.title_reserved - self.hashtags_reserved
    }

    /// Paragraphs longer than this (in chars) are eligible for a single split.
    pub fn split_threshold(&self) -> usize {
        self.chars_per_line * 2
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory holding the required fonts and background image.
    pub assets_dir: PathBuf,
    pub title_font: String,
    pub body_font: String,
    pub background: String,
    /// Explicit browser binary; auto-detected when unset.
    pub browser: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            title_font: "优设标题黑.ttf".into(),
            body_font: "No.14-上首水滴体.ttf".into(),
            background: "bg1.jpg".into(),
            browser: None,
            timeout_secs: 30,
        }
    }
}

impl RenderConfig {
    pub fn required_assets(&self) -> [&str; 3] {
        [&self.title_font, &self.body_font, &self.background]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Markup files and copied assets land here; images under `<dir>/image`.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("generated_content"),
        }
    }
}

impl OutputConfig {
    pub fn image_dir(&self) -> PathBuf {
        self.dir.join("image")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Interval of the orphaned-session sweep.
    pub sweep_interval_secs: u64,
    /// Interval of the stale-markup cleanup.
    pub cleanup_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 3600,
            cleanup_interval_secs: 3600,
        }
    }
}

impl Config {
    /// Load config from `cardpress.toml` in the working directory,
    /// falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("cardpress.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
