// src/core/paginator.rs — Greedy first-fit pagination of body text

use crate::core::estimator::estimate_height;
use crate::infra::config::CardConfig;

/// Split body text into pages that fit the card's content area.
///
/// Paragraphs are blank-line separated and processed in order with a single
/// greedy pass: each paragraph goes on the running page while the estimated
/// height stays within budget. A paragraph that does not fit either starts a
/// new page or, when longer than the split threshold, is word-split once —
/// its first part closes the current page and the remainder opens the next.
///
/// A paragraph is never rejected outright: an oversized paragraph landing on
/// an empty page is admitted unconditionally, otherwise no page could ever
/// hold it. An empty body yields zero pages.
pub fn paginate(body: &str, card: &CardConfig) -> Vec<String> {
    let paragraphs: Vec<&str> = body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let available = card.available_height();
    let mut pages: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut height = 0.0f32;

    for para in paragraphs {
        let mut para_height = estimate_height(para, card);
        if !current.is_empty() {
            para_height += card.paragraph_margin;
        }

        if height + para_height <= available || current.is_empty() {
            current.push(para.to_string());
            height += para_height;
        } else if para.chars().count() > card.split_threshold() {
            let (first, second) = split_once_at_words(para, card.split_threshold());
            if first.is_empty() {
                // First word alone blows the budget; carry the paragraph whole.
                pages.push(current.join("\n\n"));
                current = vec![para.to_string()];
            } else {
                current.push(first);
                pages.push(current.join("\n\n"));
                current = if second.is_empty() { Vec::new() } else { vec![second] };
            }
            height = para_height;
        } else {
            pages.push(current.join("\n\n"));
            current = vec![para.to_string()];
            height = para_height;
        }
    }

    if !current.is_empty() {
        pages.push(current.join("\n\n"));
    }

    pages
}

/// Word-wrap split: accumulate whole words until `budget` characters, then
/// hand everything remaining to the second part. At most one split per
/// paragraph; the second part is never split again.
fn split_once_at_words(para: &str, budget: usize) -> (String, String) {
    let mut first: Vec<&str> = Vec::new();
    let mut second: Vec<&str> = Vec::new();
    let mut used = 0usize;
    let mut overflowed = false;

    for word in para.split_whitespace() {
        let len = word.chars().count();
        if !overflowed && used + len <= budget {
            first.push(word);
            used += len + 1;
        } else {
            overflowed = true;
            second.push(word);
        }
    }

    (first.join(" "), second.join(" "))
}
