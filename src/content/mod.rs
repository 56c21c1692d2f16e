//! Content module - posts, comments, validation and markdown rendering

mod highlight;
mod markdown;
mod post;
mod validation;

pub use highlight::Highlighter;
pub use markdown::{MarkdownRenderer, DEFAULT_EXCERPT_LENGTH};
pub use post::{
    format_reading_time, sort_newest_first, Comment, NewComment, NewPost, Post, PostChanges,
    ANONYMOUS_AUTHOR, WORDS_PER_MINUTE,
};
pub use validation::{validate_fields, ValidationErrors, CONTENT_MIN_CHARS, TITLE_MAX_CHARS};
