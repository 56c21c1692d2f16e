//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on; rendered
//! markdown is the only value marked `safe`.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{
    format_reading_time, Comment, MarkdownRenderer, Post, ValidationErrors,
};
use crate::helpers::{date_part, format_timestamp};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("show.html", include_str!("blog/show.html")),
            ("form.html", include_str!("blog/form.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
        ])?;

        tera.register_filter("date_only", date_only_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template_name, context)
    }

    /// Base context shared by every page
    pub fn context(&self, config: &SiteConfig, notice: Option<&str>) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context.insert("notice", &notice.filter(|n| !n.trim().is_empty()));
        context
    }
}

/// Tera filter: date part of a stored timestamp
fn date_only_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_only", "value", String, value);
    Ok(tera::Value::String(date_part(&s).to_string()))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
        }
    }
}

/// A post card on the index page
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub category: String,
    pub created_at: String,
    pub published: bool,
    pub comment_count: usize,
    pub reading_time: String,
}

impl PostSummary {
    pub fn new(post: &Post, config: &SiteConfig) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: post.excerpt(config.excerpt_length),
            tags: post.tags.clone(),
            category: post.category.clone(),
            created_at: post.created_at.clone(),
            published: post.published,
            comment_count: post.comments.len(),
            reading_time: format_reading_time(post.reading_minutes(config.words_per_minute)),
        }
    }
}

/// A full post page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: u64,
    pub title: String,
    pub html: String,
    pub tags: Vec<String>,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
    pub edited: bool,
    pub published: bool,
    pub reading_time: String,
    pub comment_count: usize,
    pub threads: Vec<CommentThread>,
}

impl PostDetail {
    pub fn new(post: &Post, renderer: &MarkdownRenderer, config: &SiteConfig) -> Self {
        let threads = post
            .top_level_comments()
            .map(|comment| CommentThread {
                comment: CommentView::new(comment, renderer, config),
                replies: post
                    .replies_to(comment.id)
                    .map(|reply| CommentView::new(reply, renderer, config))
                    .collect(),
            })
            .collect();

        Self {
            id: post.id,
            title: post.title.clone(),
            html: renderer.render(&post.content),
            tags: post.tags.clone(),
            category: post.category.clone(),
            created_at: format_timestamp(&post.created_at, &config.timestamp_format),
            updated_at: format_timestamp(&post.updated_at, &config.timestamp_format),
            edited: post.updated_at != post.created_at,
            published: post.published,
            reading_time: format_reading_time(post.reading_minutes(config.words_per_minute)),
            comment_count: post.comments.len(),
            threads,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: u64,
    pub author: String,
    pub html: String,
    pub created_at: String,
}

impl CommentView {
    fn new(comment: &Comment, renderer: &MarkdownRenderer, config: &SiteConfig) -> Self {
        Self {
            id: comment.id,
            author: comment.display_author().to_string(),
            html: renderer.render(&comment.content),
            created_at: format_timestamp(&comment.created_at, &config.timestamp_format),
        }
    }
}

/// A top-level comment with its replies
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    pub comment: CommentView,
    pub replies: Vec<CommentView>,
}

/// Values and errors for the new/edit form
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormData {
    /// Set when editing an existing post
    pub id: Option<u64>,
    pub title: String,
    pub content: String,
    pub published: bool,
    /// Comma separated
    pub tags: String,
    pub category: String,
    pub errors: ValidationErrors,
    pub messages: Vec<String>,
}

impl FormData {
    pub fn for_post(post: &Post) -> Self {
        Self {
            id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            published: post.published,
            tags: post.tags.join(", "),
            category: post.category.clone(),
            ..Default::default()
        }
    }

    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.messages = errors.full_messages();
        self.errors = errors;
        self
    }
}
