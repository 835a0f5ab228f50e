// src/core/protocol.rs — Page generation protocol
//
// One post is driven as a sequence of requests correlated by request id:
// page 0 generates text, paginates it and renders the title card; pages
// 1..=N consume precomputed pages from the session; the final page tears
// the session down and deletes its intermediate markup. No step retries.

use std::sync::Arc;

use crate::core::clean::clean_generated;
use crate::core::paginator::paginate;
use crate::core::session::SessionStore;
use crate::infra::config::Config;
use crate::infra::errors::CardpressError;
use crate::infra::jobs::cleanup_files;
use crate::provider::TextProvider;
use crate::render::{Artifact, Card, CardRenderer};
use crate::util::truncate_str;

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub topic: String,
    pub style: String,
    /// Caller-supplied prompt; replaces the built-in template when present.
    pub prompt_override: Option<String>,
    /// Empty on page 0 means the server mints one.
    pub request_id: Option<String>,
    pub page_index: usize,
}

#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub request_id: String,
    pub page_index: usize,
    pub total_pages: usize,
    /// Present on the title page and the first content page only.
    pub title: Option<String>,
    /// The page's body text; absent on the title page.
    pub content: Option<String>,
    /// Non-empty only on the final content page.
    pub hashtags: Vec<String>,
    pub artifact: Artifact,
}

/// Protocol orchestrator; owns nothing but references the injected store
/// and gateways.
pub struct Generator {
    pub store: Arc<dyn SessionStore>,
    pub provider: Arc<dyn TextProvider>,
    pub renderer: Arc<dyn CardRenderer>,
    pub config: Arc<Config>,
}

impl Generator {
    pub async fn generate_page(&self, req: PageRequest) -> Result<PageOutcome, CardpressError> {
        if req.page_index == 0 {
            self.title_page(req).await
        } else {
            self.content_page(req).await
        }
    }

    async fn title_page(&self, req: PageRequest) -> Result<PageOutcome, CardpressError> {
        let request_id = req
            .request_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(mint_request_id);

        let prompt = build_prompt(&req.topic, &req.style, req.prompt_override.as_deref());
        let raw = self.provider.generate(&prompt).await?;
        let text = clean_generated(&raw);

        // First line is the title, each remaining line becomes a paragraph.
        let mut lines = text.lines().filter(|l| !l.is_empty());
        let title = lines.next().unwrap_or_default().to_string();
        let body = lines.collect::<Vec<_>>().join("\n\n");

        let pages = paginate(&body, &self.config.card);
        let total_pages = pages.len();
        tracing::info!(
            "generated '{}': {total_pages} page(s)",
            truncate_str(&title, 60)
        );

        if total_pages == 0 {
            // Nothing beyond the title; the post is complete after this
            // response, so no session and no markup to keep.
            let artifact = self.renderer.render(&Card::title(&title)).await?;
            for (path, e) in cleanup_files(std::slice::from_ref(&artifact.markup_path)) {
                tracing::warn!("failed to delete {}: {e}", path.display());
            }
            return Ok(PageOutcome {
                request_id,
                page_index: 0,
                total_pages: 0,
                title: Some(title),
                content: None,
                hashtags: Vec::new(),
                artifact,
            });
        }

        self.store.create(&request_id, &title, pages)?;

        match self.render_and_record(&request_id, &Card::title(&title)).await {
            Ok(artifact) => Ok(PageOutcome {
                request_id,
                page_index: 0,
                total_pages,
                title: Some(title),
                content: None,
                hashtags: Vec::new(),
                artifact,
            }),
            Err(e) => {
                self.teardown(&request_id);
                Err(e)
            }
        }
    }

    async fn content_page(&self, req: PageRequest) -> Result<PageOutcome, CardpressError> {
        let request_id = req.request_id.unwrap_or_default();
        let session = self.store.get(&request_id)?;

        // An out-of-range index is caller misuse, not a protocol failure;
        // the session stays intact.
        if req.page_index > session.total_pages {
            return Err(CardpressError::InvalidPageIndex {
                page_index: req.page_index,
                total_pages: session.total_pages,
            });
        }

        let content = session.pages[req.page_index - 1].clone();
        let is_final = req.page_index == session.total_pages;
        let hashtags = if is_final {
            self.config.card.final_page_hashtags.clone()
        } else {
            Vec::new()
        };

        let card = Card::content(&session.title, &content, hashtags.clone(), req.page_index);
        match self.render_and_record(&request_id, &card).await {
            Ok(artifact) => {
                if is_final {
                    self.teardown(&request_id);
                    tracing::info!("post '{request_id}' complete, session removed");
                }
                Ok(PageOutcome {
                    request_id,
                    page_index: req.page_index,
                    total_pages: session.total_pages,
                    title: (req.page_index == 1).then(|| session.title.clone()),
                    content: Some(content),
                    hashtags,
                    artifact,
                })
            }
            Err(e) => {
                self.teardown(&request_id);
                Err(e)
            }
        }
    }

    async fn render_and_record(
        &self,
        request_id: &str,
        card: &Card,
    ) -> Result<Artifact, CardpressError> {
        let artifact = self.renderer.render(card).await?;
        self.store.append_artifact(request_id, &artifact.markup_path)?;
        Ok(artifact)
    }

    /// Remove the session and best-effort delete its recorded markup.
    /// Cleanup failures are logged, never surfaced.
    fn teardown(&self, request_id: &str) {
        let paths = self.store.remove(request_id);
        for (path, e) in cleanup_files(&paths) {
            tracing::warn!("failed to delete {}: {e}", path.display());
        }
    }
}

/// Timestamp-based request id; millisecond precision keeps concurrent mints
/// from colliding within the sweep window.
pub fn mint_request_id() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S%3f").to_string()
}

/// Prompt for one post. A caller-supplied system prompt replaces the
/// built-in template; topic and style are appended either way.
pub fn build_prompt(topic: &str, style: &str, prompt_override: Option<&str>) -> String {
    match prompt_override {
        Some(system) if !system.trim().is_empty() => {
            format!("{system}\n\n主题：{topic}\n风格：{style}")
        }
        _ => format!(
            "请你扮演一个90后小红书博主，围绕主题\"{topic}\"创作一篇{style}风格的文案。\n\
             要求：\n\
             1. 文案总字数控制在5000字之间\n\
             2. 标题要简短吸引人，带有emoji，最多10字，需要能自然分成三行，标题严格限制在10字以内！\n\
             3. 正文分段阐述，每段都要带emoji\n\
             4. 使用网络流行语，要有年轻人的语气\n\
             5. 内容要接地气，像朋友在聊天\n\
             6. 每段都要简短有力，突出重点\n\
             7. 使用中文标点符号"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_request_id_format() {
        let id = mint_request_id();
        // %Y%m%d_%H%M%S%3f
        assert_eq!(id.len(), 18);
        assert_eq!(id.chars().nth(8), Some('_'));
    }

    #[test]
    fn test_build_prompt_default_mentions_topic_and_style() {
        let p = build_prompt("晨跑", "轻松活泼", None);
        assert!(p.contains("晨跑"));
        assert!(p.contains("轻松活泼"));
    }

    #[test]
    fn test_build_prompt_override_replaces_template() {
        let p = build_prompt("晨跑", "干货分享", Some("You are a copywriter."));
        assert!(p.starts_with("You are a copywriter."));
        assert!(p.contains("主题：晨跑"));
        assert!(!p.contains("小红书博主"));
    }

    #[test]
    fn test_blank_override_falls_back_to_template() {
        let p = build_prompt("晨跑", "干货分享", Some("   "));
        assert!(p.contains("小红书博主"));
    }
}
