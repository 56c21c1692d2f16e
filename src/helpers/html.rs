//! HTML helper functions

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Link targets that must never reach an `href`
pub fn is_unsafe_url(url: &str) -> bool {
    let lowered: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// Split a comma separated tag field into trimmed, non-empty tags
///
/// # Examples
/// ```ignore
/// parse_tags(" rust, web ,, ") // -> ["rust", "web"]
/// ```
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a redirect target carrying a user-facing notice
pub fn with_notice(path: &str, notice: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!(
        "{}{}notice={}",
        path,
        sep,
        utf8_percent_encode(notice, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        let raw = r#"<a href="x">Tom & 'Jerry'</a>"#;
        assert_eq!(
            html_escape(raw),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_unsafe_url() {
        assert!(is_unsafe_url("javascript:alert(1)"));
        assert!(is_unsafe_url("  JavaScript:alert(1)"));
        assert!(is_unsafe_url("java\tscript:alert(1)"));
        assert!(is_unsafe_url("data:text/html;base64,xx"));
        assert!(!is_unsafe_url("https://example.com"));
        assert!(!is_unsafe_url("/posts/1"));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" rust, web ,, "), vec!["rust", "web"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_with_notice() {
        assert_eq!(with_notice("/", "Post deleted"), "/?notice=Post%20deleted");
        assert_eq!(
            with_notice("/posts/1?preview=true", "ok"),
            "/posts/1?preview=true&notice=ok"
        );
    }
}
