// src/api/types.rs

use serde::{Deserialize, Deserializer, Serialize};

/// Page index arrives as an integer or, from older clients, a numeric
/// string (empty string means 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageIndex(pub usize);

impl<'de> Deserialize<'de> for PageIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(usize),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(n) => Ok(PageIndex(n)),
            Repr::Str(s) if s.trim().is_empty() => Ok(PageIndex(0)),
            Repr::Str(s) => s
                .trim()
                .parse()
                .map(PageIndex)
                .map_err(|_| serde::de::Error::custom(format!("invalid page_index '{s}'"))),
        }
    }
}

/// Request body for POST /generate.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub page_index: PageIndex,
}

fn default_style() -> String {
    "轻松活泼".into()
}

/// Response body for POST /generate. `Deserialize` so the bulk-submission
/// client can reuse it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: String,
    pub request_id: String,
    pub page_index: usize,
    pub total_pages: usize,
    pub is_first: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub hashtags: Vec<String>,
    pub html_path: String,
    pub image_path: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
