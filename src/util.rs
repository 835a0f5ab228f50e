// src/util.rs — Shared utility functions

/// Truncate a string for display/logging (UTF-8 safe, cuts on a char
/// boundary at or below `max_len` bytes).
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_len)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Strip characters a post title may carry but a metadata record should not:
/// emoji blocks and filesystem-hostile punctuation.
pub fn sanitize_title(title: &str) -> String {
    const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    let cleaned: String = title
        .chars()
        .filter(|c| !is_emoji(*c) && !ILLEGAL.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() {
        "未命名文章".to_string()
    } else {
        cleaned
    }
}

fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1F5FF   // symbols & pictographs
        | 0x1F600..=0x1F64F // emoticons
        | 0x1F680..=0x1F6FF // transport & map
        | 0x1F900..=0x1F9FF // supplemental symbols
        | 0x2600..=0x27BF   // misc symbols, dingbats
        | 0x1F1E6..=0x1F1FF // regional indicators
        | 0xFE0F            // variation selector
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_and_exact() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        // é is two bytes; cutting at 4 must not split it
        assert_eq!(truncate_str("café!", 4), "caf");
    }

    #[test]
    fn test_sanitize_strips_emoji_and_illegal_chars() {
        assert_eq!(sanitize_title("✨秋日穿搭✨"), "秋日穿搭");
        assert_eq!(sanitize_title("a/b:c*d"), "abcd");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_title("🍭✨"), "未命名文章");
        assert_eq!(sanitize_title("   "), "未命名文章");
    }
}
