// Sanitization utilities
use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

fn entity_pattern() -> &'static Regex {
    static ENTITIES: OnceLock<Regex> = OnceLock::new();
    ENTITIES.get_or_init(|| Regex::new(r"&[^;]+;").expect("valid entity pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Sanitize HTML content using ammonia library for comprehensive XSS protection
pub fn sanitize_html(text: &str) -> String {
    ammonia::clean(text)
}

/// Remove tags and replace HTML entities with a space
pub fn strip_html(html: &str) -> String {
    let without_tags = tag_pattern().replace_all(html, "");
    entity_pattern()
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Truncate text to a maximum number of characters, marking the cut with `...`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Lowercase a label and join its words with `-` ("Main Course" -> "main-course")
pub fn slugify(label: &str) -> String {
    whitespace_pattern()
        .replace_all(label.trim(), "-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_html() {
        // ammonia should remove script tags entirely
        assert!(!sanitize_html("<script>alert('xss')</script>").contains("script"));

        // ammonia should allow safe HTML
        let safe_html = "<p>Hello <b>world</b></p>";
        let sanitized = sanitize_html(safe_html);
        assert!(sanitized.contains("<p>"));
        assert!(sanitized.contains("<b>"));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<b>Pasta</b> with <a href=\"x\">garlic</a>&nbsp;oil"),
            "Pasta with garlic oil"
        );
        assert_eq!(strip_html("  plain  "), "plain");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("hello world", 6), "hello...");
        // Multi-byte characters are counted, not bytes
        assert_eq!(truncate("crème brûlée", 5), "crème...");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Main Course"), "main-course");
        assert_eq!(slugify("Lacto  Ovo Vegetarian"), "lacto-ovo-vegetarian");
        assert_eq!(slugify("dessert"), "dessert");
    }
}
