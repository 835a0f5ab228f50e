// src/infra/errors.rs — Error types for cardpress

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardpressError {
    // Text generation gateway
    #[error("Text backend unreachable: {0}")]
    BackendUnavailable(String),

    #[error("Text generation timed out after {0}s")]
    GenerationTimeout(u64),

    #[error("Text backend produced empty output")]
    EmptyGeneration,

    // Protocol misuse (client errors)
    #[error("Unknown request id '{request_id}'")]
    UnknownSession { request_id: String },

    #[error("Session '{request_id}' already exists")]
    DuplicateSession { request_id: String },

    #[error("Page index {page_index} out of range ({page_index}/{total_pages})")]
    InvalidPageIndex {
        page_index: usize,
        total_pages: usize,
    },

    // Render gateway
    #[error("Missing required asset: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("Render failed: {0}")]
    RenderFailure(String),

    #[error("Render timed out after {0}s")]
    RenderTimeout(u64),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardpressError {
    /// True for errors caused by the caller (mapped to 400-class responses).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CardpressError::UnknownSession { .. }
                | CardpressError::DuplicateSession { .. }
                | CardpressError::InvalidPageIndex { .. }
        )
    }
}
