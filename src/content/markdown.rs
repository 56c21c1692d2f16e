//! Markdown rendering with syntax highlighting
//!
//! The renderer is the HTML-safety boundary of the blog: raw HTML in the
//! source is emitted as escaped text, code is always escaped, and link
//! targets with script schemes are neutralised.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::highlight::Highlighter;
use crate::config::HighlightConfig;
use crate::helpers::{html_escape, is_unsafe_url};

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

lazy_static! {
    static ref MARKUP_CHARS: Regex = Regex::new(r"[#*`_~\[\]()>]").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"(?:\r?\n)+").unwrap();
}

/// Markdown renderer with optional syntax highlighting
#[derive(Default)]
pub struct MarkdownRenderer {
    highlighter: Option<Highlighter>,
}

/// Fenced or indented code block being collected
struct CodeBlock {
    lang: Option<String>,
    code: String,
}

impl MarkdownRenderer {
    /// Create a renderer without highlighting
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Create a renderer that highlights known languages
    pub fn with_highlighter(highlighter: Highlighter) -> Self {
        Self {
            highlighter: Some(highlighter),
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        if config.enable {
            Self::with_highlighter(Highlighter::from_config(config))
        } else {
            Self::new()
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return String::new();
        }

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        for event in parser {
            if let Some(block) = code_block.as_mut() {
                match event {
                    Event::Text(text) => block.code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(block) = code_block.take() {
                            events.push(Event::Html(CowStr::from(self.code_block_html(&block))));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        code: String::new(),
                    });
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    events.push(Event::Html(CowStr::from(link_open(&dest_url, &title))));
                }
                Event::End(TagEnd::Link) => events.push(Event::Html(CowStr::from("</a>"))),
                // Raw HTML is shown, never interpreted
                Event::Start(Tag::HtmlBlock) => events.push(Event::Start(Tag::Paragraph)),
                Event::End(TagEnd::HtmlBlock) => events.push(Event::End(TagEnd::Paragraph)),
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                Event::SoftBreak => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }

    /// Render one code block, highlighted when the language is known
    fn code_block_html(&self, block: &CodeBlock) -> String {
        if let (Some(highlighter), Some(lang)) = (&self.highlighter, block.lang.as_deref()) {
            if let Some(highlighted) = highlighter.highlight(&block.code, lang) {
                return highlighted;
            }
            tracing::debug!("No highlighting for language {:?}", lang);
        }
        plain_code_block(&block.code, block.lang.as_deref())
    }

    /// Strip markdown punctuation and truncate for excerpts.
    ///
    /// This does not parse structure, so malformed markdown degrades to
    /// slightly noisy text instead of failing. When the text is longer than
    /// `limit` characters the first `limit + 1` are kept and `...` appended.
    pub fn extract_plain_text(markdown: &str, limit: usize) -> String {
        let stripped = MARKUP_CHARS.replace_all(markdown, "");
        let plain = LINE_BREAKS.replace_all(&stripped, " ");
        let plain = plain.trim();

        if plain.chars().count() > limit {
            let head: String = plain.chars().take(limit + 1).collect();
            format!("{}...", head)
        } else {
            plain.to_string()
        }
    }
}

/// First word of a fence info string ("rust,ignore" -> "rust")
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Opening anchor tag; links always open in a new browsing context
fn link_open(dest: &str, title: &str) -> String {
    let href = if is_unsafe_url(dest) {
        "#".to_string()
    } else {
        html_escape(dest)
    };
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, html_escape(title))
    };
    format!(
        r#"<a href="{}"{} target="_blank" rel="noopener">"#,
        href, title_attr
    )
}
