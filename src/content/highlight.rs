//! Syntax highlighting for fenced code blocks

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// syntect-backed code highlighter
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl Highlighter {
    /// Create a highlighter with the given syntect theme
    pub fn new(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(&config.theme, config.line_number)
    }

    /// Whether a language tag resolves to a known syntax
    pub fn supports(&self, lang: &str) -> bool {
        self.syntax_set.find_syntax_by_token(lang).is_some()
    }

    /// Highlight `code` as `lang`.
    ///
    /// Returns `None` when the language is unknown or highlighting fails, in
    /// which case the caller keeps its plain block.
    pub fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self.syntax_set.find_syntax_by_token(lang)?;
        let theme = self.theme()?;

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                let lang = html_escape(lang);
                if self.line_numbers {
                    Some(add_line_numbers(&highlighted, code, &lang))
                } else {
                    Some(format!(
                        r#"<figure class="highlight {}">{}</figure>"#,
                        lang, highlighted
                    ))
                }
            }
            Err(e) => {
                tracing::warn!("Failed to highlight {} code block: {}", lang, e);
                None
            }
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }
}

/// Wrap highlighted code in a table with a line-number gutter
fn add_line_numbers(highlighted: &str, code: &str, lang: &str) -> String {
    let line_count = code.lines().count().max(1);

    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, highlighted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let highlighter = Highlighter::new("InspiredGitHub", false);
        let html = highlighter.highlight("fn main() {}\n", "rust").unwrap();
        assert!(html.starts_with(r#"<figure class="highlight rust">"#));
        assert!(html.contains("style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_is_none() {
        let highlighter = Highlighter::new("InspiredGitHub", false);
        assert!(!highlighter.supports("definitely-not-a-language"));
        assert!(highlighter
            .highlight("whatever", "definitely-not-a-language")
            .is_none());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = Highlighter::new("no-such-theme", false);
        assert!(highlighter.highlight("x = 1\n", "python").is_some());
    }

    #[test]
    fn test_line_numbers() {
        let highlighter = Highlighter::new("InspiredGitHub", true);
        let html = highlighter.highlight("a = 1\nb = 2\n", "python").unwrap();
        assert!(html.contains(r#"<span class="line-number">1</span>"#));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
        assert!(!html.contains(r#"<span class="line-number">3</span>"#));
    }
}
