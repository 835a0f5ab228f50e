// src/cli/submit.rs — Bulk-submission client
//
// Drives one topic at a time through the page-0..page-N protocol against a
// running service, collects the rendered images into numbered folders and
// writes a content.json per post. One failed page is skipped, a failed
// topic moves on to the next; the server never retries, so neither do we.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::types::GenerateResponse;
use crate::util::sanitize_title;

/// Pause between protocol steps; client-side backpressure, the server does
/// not require it.
const STEP_PAUSE: Duration = Duration::from_secs(2);

pub struct SubmitOptions {
    pub server: String,
    pub style: String,
}

#[derive(Debug, Serialize)]
struct TopicRecord {
    folder_number: u32,
    title: String,
    topic: String,
    content: Vec<String>,
    hashtags: Vec<String>,
}

pub async fn run_submit(mut topics: Vec<String>, times: u32, opts: SubmitOptions) -> anyhow::Result<()> {
    if topics.is_empty() {
        topics = prompt_topics()?;
    }
    if topics.is_empty() {
        anyhow::bail!("no topics to generate");
    }
    let topics: Vec<String> = topics
        .into_iter()
        .flat_map(|t| std::iter::repeat(t).take(times.max(1) as usize))
        .collect();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    check_server(&client, &opts.server).await?;

    let total = topics.len();
    let mut successful = 0;
    for (index, topic) in topics.iter().enumerate() {
        tracing::info!("topic {}/{total}: {topic}", index + 1);
        match submit_topic(&client, topic, &opts).await {
            Ok(record) => {
                successful += 1;
                tracing::info!("topic '{}' done (folder {})", record.title, record.folder_number);
            }
            Err(e) => {
                tracing::error!("topic '{topic}' failed: {e}");
            }
        }
        if index + 1 < total {
            tokio::time::sleep(STEP_PAUSE).await;
        }
    }

    tracing::info!("finished: {successful}/{total} topics succeeded");
    Ok(())
}

async fn check_server(client: &reqwest::Client, server: &str) -> anyhow::Result<()> {
    let resp = client
        .get(format!("{server}/health"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("cannot reach service at {server}: {e}"))?;
    anyhow::ensure!(
        resp.status().is_success(),
        "service at {server} is unhealthy: HTTP {}",
        resp.status()
    );
    Ok(())
}

async fn submit_topic(
    client: &reqwest::Client,
    topic: &str,
    opts: &SubmitOptions,
) -> anyhow::Result<TopicRecord> {
    let url = format!("{}/generate", opts.server);

    // Page 0: title card plus the session that holds the paginated body.
    let first: GenerateResponse = post_page(client, &url, topic, opts, "", 0).await?;
    let title = first
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| topic.to_string());

    let base_dir = PathBuf::from("image");
    std::fs::create_dir_all(&base_dir)?;
    let folder_number = next_folder_number(&base_dir)?;
    let topic_dir = base_dir.join(folder_number.to_string());
    std::fs::create_dir_all(&topic_dir)?;

    collect_image(&first.image_path, &topic_dir);

    let mut record = TopicRecord {
        folder_number,
        title: sanitize_title(&title),
        topic: topic.to_string(),
        content: Vec::new(),
        hashtags: Vec::new(),
    };

    for page_index in 1..=first.total_pages {
        tokio::time::sleep(STEP_PAUSE).await;
        tracing::info!("page {page_index}/{}", first.total_pages);

        let page = match post_page(client, &url, topic, opts, &first.request_id, page_index).await
        {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("page {page_index} failed, skipping: {e}");
                continue;
            }
        };

        collect_image(&page.image_path, &topic_dir);
        record.content.push(page.content.unwrap_or_default());
        if page_index == first.total_pages {
            record.hashtags = page.hashtags;
        }
    }

    let json_path = topic_dir.join("content.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&record)?)?;
    Ok(record)
}

async fn post_page(
    client: &reqwest::Client,
    url: &str,
    topic: &str,
    opts: &SubmitOptions,
    request_id: &str,
    page_index: usize,
) -> anyhow::Result<GenerateResponse> {
    let resp = client
        .post(url)
        .json(&serde_json::json!({
            "topic": topic,
            "style": opts.style,
            "request_id": request_id,
            "page_index": page_index,
        }))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("HTTP {status}: {body}");
    }
    Ok(resp.json().await?)
}

/// Move a rendered image into the topic folder, keeping its positional name.
fn collect_image(image_path: &str, topic_dir: &Path) {
    let src = Path::new(image_path);
    let Some(name) = src.file_name() else {
        return;
    };
    if !src.exists() {
        tracing::error!("image missing: {image_path}");
        return;
    }
    if let Err(e) = std::fs::rename(src, topic_dir.join(name)) {
        tracing::error!("failed to move {image_path}: {e}");
    }
}

/// Next free numeric folder under `base`, starting at 1.
fn next_folder_number(base: &Path) -> anyhow::Result<u32> {
    let mut max = 0u32;
    for entry in std::fs::read_dir(base)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Ok(n) = entry.file_name().to_string_lossy().parse::<u32>() {
                max = max.max(n);
            }
        }
    }
    Ok(max + 1)
}

fn prompt_topics() -> anyhow::Result<Vec<String>> {
    let mut topics = Vec::new();
    loop {
        let topic = inquire::Text::new("Topic (empty to finish):").prompt()?;
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            break;
        }
        topics.push(topic);
    }
    Ok(topics)
}
