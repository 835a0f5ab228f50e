// tests/protocol_test.rs — Integration test: multi-page protocol with fake gateways

mod common;

use std::sync::Arc;

use cardpress::core::protocol::{PageOutcome, PageRequest};
use cardpress::core::session::{MemoryStore, SessionStore};
use cardpress::infra::errors::CardpressError;

use common::*;

fn page_request(request_id: &str, page_index: usize) -> PageRequest {
    PageRequest {
        topic: "晨跑".into(),
        style: "干货分享".into(),
        prompt_override: None,
        request_id: (!request_id.is_empty()).then(|| request_id.to_string()),
        page_index,
    }
}

fn count_markup(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|e| e.file_name().to_string_lossy().ends_with(".html"))
        .count()
}

#[tokio::test]
async fn test_full_post_flow() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let gen = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );

    // Page 0: title card, session created with the paginated body.
    let first = gen.generate_page(page_request("", 0)).await.unwrap();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.title.as_deref(), Some("✨测试标题✨"));
    assert!(first.content.is_none());
    assert!(first.hashtags.is_empty());
    assert!(!first.request_id.is_empty());

    let session = store.get(&first.request_id).unwrap();
    assert_eq!(session.total_pages, 3);

    // Pages 1..=3 in order.
    let mut outcomes: Vec<PageOutcome> = Vec::new();
    for page_index in 1..=3 {
        let outcome = gen
            .generate_page(page_request(&first.request_id, page_index))
            .await
            .unwrap();
        assert_eq!(outcome.page_index, page_index);
        assert_eq!(outcome.total_pages, 3);
        outcomes.push(outcome);
    }

    // Title only on the first content page, hashtags only on the last.
    assert!(outcomes[0].title.is_some());
    assert!(outcomes[1].title.is_none());
    assert!(outcomes[0].hashtags.is_empty());
    assert!(outcomes[1].hashtags.is_empty());
    assert_eq!(outcomes[2].hashtags, vec!["#生活分享".to_string()]);

    // Page contents line up with the session's pages, in order.
    for (outcome, page) in outcomes.iter().zip(&session.pages) {
        assert_eq!(outcome.content.as_deref(), Some(page.as_str()));
    }

    // Final page tore the session down and deleted every markup file;
    // the images remain.
    assert!(matches!(
        store.get(&first.request_id),
        Err(CardpressError::UnknownSession { .. })
    ));
    assert_eq!(count_markup(dir.path()), 0);
    for n in 1..=4 {
        assert!(dir.path().join("image").join(format!("{n}.png")).exists());
    }
}

#[tokio::test]
async fn test_out_of_range_page_leaves_session_intact() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let gen = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );

    let first = gen.generate_page(page_request("", 0)).await.unwrap();
    let err = gen
        .generate_page(page_request(&first.request_id, 5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CardpressError::InvalidPageIndex {
            page_index: 5,
            total_pages: 3
        }
    ));

    // Misuse must not tear the session down.
    assert!(store.get(&first.request_id).is_ok());

    // The post can still finish normally afterwards.
    for page_index in 1..=3 {
        gen.generate_page(page_request(&first.request_id, page_index))
            .await
            .unwrap();
    }
    assert!(store.get(&first.request_id).is_err());
}

#[tokio::test]
async fn test_unknown_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let gen = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        Arc::new(MemoryStore::new()),
    );

    let err = gen
        .generate_page(page_request("20240101_000000000", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CardpressError::UnknownSession { .. }));
}

#[tokio::test]
async fn test_render_failure_tears_down_session_and_markup() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let gen = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::failing_on(dir.path().to_path_buf(), 2)),
        store.clone(),
    );

    let first = gen.generate_page(page_request("", 0)).await.unwrap();
    gen.generate_page(page_request(&first.request_id, 1))
        .await
        .unwrap();
    assert_eq!(count_markup(dir.path()), 2);

    let err = gen
        .generate_page(page_request(&first.request_id, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, CardpressError::RenderFailure(_)));

    // Session gone, recorded markup best-effort deleted.
    assert!(store.get(&first.request_id).is_err());
    assert_eq!(count_markup(dir.path()), 0);
}

#[tokio::test]
async fn test_failure_before_create_leaves_no_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());

    let failing = generator(
        Arc::new(DownProvider),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );
    let err = failing.generate_page(page_request("", 0)).await.unwrap_err();
    assert!(matches!(err, CardpressError::BackendUnavailable(_)));
    assert!(store.is_empty());

    // A fresh request against the same store succeeds independently.
    let working = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );
    let first = working.generate_page(page_request("", 0)).await.unwrap();
    assert_eq!(first.total_pages, 3);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_title_only_output_completes_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let gen = generator(
        Arc::new(CannedProvider::new("只有标题\n")),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );

    let outcome = gen.generate_page(page_request("", 0)).await.unwrap();
    assert_eq!(outcome.total_pages, 0);
    assert_eq!(outcome.title.as_deref(), Some("只有标题"));

    // Terminal response: no session to drive and no markup left behind.
    assert!(store.is_empty());
    assert_eq!(count_markup(dir.path()), 0);
    assert!(dir.path().join("image").join("1.png").exists());
}

#[tokio::test]
async fn test_caller_supplied_request_id_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let gen = generator(
        Arc::new(CannedProvider::new(&six_paragraph_text())),
        Arc::new(FileRenderer::new(dir.path().to_path_buf())),
        store.clone(),
    );

    let first = gen
        .generate_page(page_request("client-chosen-id", 0))
        .await
        .unwrap();
    assert_eq!(first.request_id, "client-chosen-id");
    assert!(store.get("client-chosen-id").is_ok());

    // Reusing a live id on page 0 is guarded against.
    let err = gen
        .generate_page(page_request("client-chosen-id", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, CardpressError::DuplicateSession { .. }));
}
