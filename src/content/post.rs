//! Post and Comment models

use serde::{Deserialize, Deserializer, Serialize};

use super::markdown::{MarkdownRenderer, DEFAULT_EXCERPT_LENGTH};
use super::validation::{validate_fields, ValidationErrors};

/// Author name used when a comment is submitted without one
pub const ANONYMOUS_AUTHOR: &str = "anonymous";

/// Average reading speed used for reading time
pub const WORDS_PER_MINUTE: usize = 200;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A blog post as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,

    pub title: String,

    /// Markdown source
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Empty when uncategorized
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn is_draft(&self) -> bool {
        !self.published
    }

    /// Whitespace separated word count of the markdown source
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Minutes to read at `words_per_minute`, rounded up
    pub fn reading_minutes(&self, words_per_minute: usize) -> usize {
        self.word_count().div_ceil(words_per_minute.max(1))
    }

    /// Reading time at the default speed, e.g. "3 minutes"
    pub fn reading_time(&self) -> String {
        format_reading_time(self.reading_minutes(WORDS_PER_MINUTE))
    }

    /// Plain-text excerpt of at most `limit + 1` characters plus "..."
    pub fn excerpt(&self, limit: usize) -> String {
        MarkdownRenderer::extract_plain_text(&self.content, limit)
    }

    pub fn default_excerpt(&self) -> String {
        self.excerpt(DEFAULT_EXCERPT_LENGTH)
    }

    /// Creation time when published, `None` for drafts
    pub fn published_at(&self) -> Option<&str> {
        self.is_published().then_some(self.created_at.as_str())
    }

    pub fn validate(&self) -> ValidationErrors {
        validate_fields(Some(&self.title), Some(&self.content))
    }

    /// Comments that are not replies, in insertion order
    pub fn top_level_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter().filter(|c| c.parent_id.is_none())
    }

    /// Replies to one comment, in insertion order
    pub fn replies_to(&self, comment_id: u64) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .filter(move |c| c.parent_id == Some(comment_id))
    }

    pub fn find_comment(&self, comment_id: u64) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Case-insensitive match on title, content, tags or category.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self.category.to_lowercase().contains(needle)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Apply the supplied fields of `changes`
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(published) = changes.published {
            self.published = published;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
    }
}

/// "1 minute", "4 minutes"
pub fn format_reading_time(minutes: usize) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

/// Sort posts newest first by creation time, then by id
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// A comment on a post; `parent_id` marks a one-level reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique within its post
    pub id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,

    /// Markdown source
    pub content: String,

    #[serde(default)]
    pub parent_id: Option<u64>,

    #[serde(default)]
    pub created_at: String,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Author for display, falling back to [`ANONYMOUS_AUTHOR`]
    pub fn display_author(&self) -> &str {
        if self.author.trim().is_empty() {
            ANONYMOUS_AUTHOR
        } else {
            &self.author
        }
    }
}

/// Fields for a new post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub tags: Vec<String>,
    pub category: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn validate(&self) -> ValidationErrors {
        validate_fields(Some(&self.title), Some(&self.content))
    }
}

/// Field-level partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validate only the fields being changed
    pub fn validate(&self) -> ValidationErrors {
        validate_fields(self.title.as_deref(), self.content.as_deref())
    }
}

impl From<NewPost> for PostChanges {
    fn from(post: NewPost) -> Self {
        Self {
            title: Some(post.title),
            content: Some(post.content),
            published: Some(post.published),
            tags: Some(post.tags),
            category: Some(post.category),
        }
    }
}

/// Fields for a new comment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewComment {
    pub author: String,
    pub content: String,
    pub parent_id: Option<u64>,
}

impl NewComment {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            parent_id: None,
        }
    }

    pub fn reply_to(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content: &str, published: bool) -> Post {
        Post {
            id: 1,
            title: "Hello".to_string(),
            content: content.to_string(),
            published,
            tags: vec!["Rust".to_string()],
            category: "Programming".to_string(),
            comments: Vec::new(),
            created_at: "2024-01-15 10:30:00".to_string(),
            updated_at: "2024-01-15 10:30:00".to_string(),
        }
    }

    fn comment(id: u64, parent_id: Option<u64>) -> Comment {
        Comment {
            id,
            author: String::new(),
            content: format!("comment {}", id),
            parent_id,
            created_at: "2024-01-15 11:00:00".to_string(),
        }
    }

    #[test]
    fn test_published_and_draft() {
        let published = post("content here", true);
        assert!(published.is_published());
        assert!(!published.is_draft());
        assert_eq!(published.published_at(), Some("2024-01-15 10:30:00"));

        let draft = post("content here", false);
        assert!(draft.is_draft());
        assert_eq!(draft.published_at(), None);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(post("", true).reading_time(), "0 minutes");
        assert_eq!(post("one two three", true).reading_time(), "1 minute");

        let long = vec!["word"; 401].join(" ");
        assert_eq!(post(&long, true).reading_time(), "3 minutes");
        assert_eq!(post(&long, true).reading_minutes(400), 2);
    }

    #[test]
    fn test_excerpt() {
        let p = post("# Heading\n\nSome **bold** text", true);
        assert_eq!(p.excerpt(150), "Heading Some bold text");
        assert_eq!(p.excerpt(3), "Head...");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let p = post("Body about Tokio", true);
        assert!(p.matches("hello"));
        assert!(p.matches("tokio"));
        assert!(p.matches("rust"));
        assert!(p.matches("programming"));
        assert!(!p.matches("python"));
    }

    #[test]
    fn test_comment_threads() {
        let mut p = post("content here", true);
        p.comments = vec![comment(1, None), comment(2, Some(1)), comment(3, None)];

        let top: Vec<u64> = p.top_level_comments().map(|c| c.id).collect();
        assert_eq!(top, vec![1, 3]);
        let replies: Vec<u64> = p.replies_to(1).map(|c| c.id).collect();
        assert_eq!(replies, vec![2]);
        assert!(p.replies_to(3).next().is_none());
        assert!(p.find_comment(2).unwrap().is_reply());
        assert_eq!(p.find_comment(2).unwrap().display_author(), ANONYMOUS_AUTHOR);
    }

    #[test]
    fn test_apply_changes() {
        let mut p = post("content here", false);
        p.apply(PostChanges::default());
        assert_eq!(p, post("content here", false));

        p.apply(PostChanges {
            title: Some("New".to_string()),
            published: Some(true),
            ..Default::default()
        });
        assert_eq!(p.title, "New");
        assert!(p.published);
        assert_eq!(p.content, "content here");
        assert_eq!(p.tags, vec!["Rust"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut a = post("content here", true);
        a.id = 1;
        a.created_at = "2024-01-01 00:00:00".to_string();
        let mut b = a.clone();
        b.id = 2;
        let mut c = a.clone();
        c.id = 3;
        c.created_at = "2023-12-31 23:59:59".to_string();

        let mut posts = vec![c, a, b];
        sort_newest_first(&mut posts);
        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "id": 4,
            "title": "Old",
            "content": "from before tags existed",
            "published": true,
            "category": null,
            "created_at": "2024-01-01 00:00:00",
            "updated_at": "2024-01-01 00:00:00"
        }"#;
        let p: Post = serde_json::from_str(json).unwrap();
        assert!(p.tags.is_empty());
        assert!(p.comments.is_empty());
        assert_eq!(p.category, "");
    }

    #[test]
    fn test_new_post_validation() {
        assert!(NewPost::new("Hello", "1234567890").validate().is_empty());
        assert!(!NewPost::new("", "1234567890").validate().is_empty());
        assert!(PostChanges::default().validate().is_empty());
        assert!(PostChanges::default().is_empty());
    }
}
