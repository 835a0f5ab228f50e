// src/core/clean.rs — Strip out-of-band markers from generated text
//
// Reasoning models interleave "think" spans with the actual copy; those and
// any HTML comments must never reach the renderer.

use regex::Regex;
use std::sync::LazyLock;

static MARKER_SPANS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?s)<think>.*?</think>",
        r"(?s)\[思考\].*?\[/思考\]",
        r"(?s)【思考】.*?【/思考】",
        r"(?s)（思考）.*?（/思考）",
        r"(?s)<!--.*?-->",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid marker pattern"))
    .collect()
});

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank-run pattern"));

/// Remove non-content markers from raw model output: think spans (ASCII and
/// CJK bracket variants), HTML comments, runs of blank lines collapsed to a
/// single paragraph break, every line trimmed.
pub fn clean_generated(text: &str) -> String {
    let mut out = text.to_string();
    for re in MARKER_SPANS.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out = BLANK_RUNS.replace_all(&out, "\n\n").into_owned();
    out = out
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_think_spans() {
        let raw = "<think>planning\nthe post</think>标题\n\n正文";
        assert_eq!(clean_generated(raw), "标题\n\n正文");
    }

    #[test]
    fn test_strips_cjk_marker_variants() {
        let raw = "[思考]a[/思考]【思考】b【/思考】（思考）c（/思考）title";
        assert_eq!(clean_generated(raw), "title");
    }

    #[test]
    fn test_strips_html_comments() {
        assert_eq!(clean_generated("a<!-- note\nnote -->b"), "ab");
    }

    #[test]
    fn test_collapses_blank_runs_and_trims_lines() {
        let raw = "  title  \n\n\n\n  para one  \n\n  para two  ";
        assert_eq!(clean_generated(raw), "title\n\npara one\n\npara two");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(clean_generated("title\n\nbody"), "title\n\nbody");
    }

    #[test]
    fn test_all_markers_yields_empty() {
        assert_eq!(clean_generated("<think>only thoughts</think>"), "");
    }
}
