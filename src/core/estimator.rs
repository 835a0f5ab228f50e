// src/core/estimator.rs — Estimated rendered height of one paragraph

use crate::infra::config::CardConfig;

/// Glyphs the renderer draws wider than a text character; each one is
/// charged `glyph_extra_weight` extra characters of line budget.
pub const DECORATIVE_GLYPHS: [char; 3] = ['🌸', '✨', '🍭'];

/// Estimate the rendered height of a paragraph in card pixels.
///
/// effective length = chars + decorative glyphs × extra weight,
/// lines = ceil(effective / chars_per_line) (at least 1 for non-empty text),
/// height = lines × font_size × line_height + paragraph_padding.
///
/// Deterministic and monotonic in input length. The empty string has zero
/// lines and costs only the paragraph padding.
pub fn estimate_height(text: &str, card: &CardConfig) -> f32 {
    let chars = text.chars().count();
    let decorative = text
        .chars()
        .filter(|c| DECORATIVE_GLYPHS.contains(c))
        .count();
    let effective = chars + decorative * card.glyph_extra_weight;

    let lines = if effective == 0 {
        0
    } else {
        ((effective as f32 / card.chars_per_line as f32).ceil() as usize).max(1)
    };

    lines as f32 * card.font_size * card.line_height + card.paragraph_padding
}
