//! Request bodies and query strings

use serde::{Deserialize, Serialize};

use crate::content::{NewComment, NewPost, PostChanges};
use crate::helpers::parse_tags;
use crate::templates::FormData;

/// Post form fields; every field is optional so partial updates work
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    /// Method override for plain HTML forms
    #[serde(rename = "_method")]
    pub method: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<String>,
    /// Sent by the edit form so an unchecked box still means "unpublish"
    pub published_field: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
}

impl PostForm {
    /// Checkbox semantics: absent means unchecked
    pub fn is_published(&self) -> bool {
        matches!(
            self.published.as_deref().map(str::trim),
            Some("on" | "true" | "1")
        )
    }

    pub fn method(&self) -> String {
        self.method
            .as_deref()
            .unwrap_or("post")
            .trim()
            .to_ascii_lowercase()
    }

    pub fn to_new_post(&self) -> NewPost {
        NewPost {
            title: self.title.as_deref().unwrap_or_default().trim().to_string(),
            content: self.content.clone().unwrap_or_default(),
            published: self.is_published(),
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
            category: self.category.as_deref().unwrap_or_default().trim().to_string(),
        }
    }

    pub fn to_changes(&self) -> PostChanges {
        PostChanges {
            title: self.title.as_deref().map(|t| t.trim().to_string()),
            content: self.content.clone(),
            published: (self.published.is_some() || self.published_field.is_some())
                .then(|| self.is_published()),
            tags: self.tags.as_deref().map(parse_tags),
            category: self.category.as_deref().map(|c| c.trim().to_string()),
        }
    }

    /// Echo the submitted values back into the form
    pub fn to_form_data(&self, id: Option<u64>) -> FormData {
        FormData {
            id,
            title: self.title.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
            published: self.is_published(),
            tags: self.tags.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    pub author: Option<String>,
    pub comment_content: Option<String>,
    /// Empty when the comment is top-level
    pub parent_id: Option<String>,
}

impl CommentForm {
    /// `None` when there is nothing to store
    pub fn to_new_comment(&self) -> Option<NewComment> {
        let content = self.comment_content.as_deref().unwrap_or_default();
        if content.trim().is_empty() {
            return None;
        }

        let comment = NewComment::new(self.author.clone().unwrap_or_default(), content);
        Some(
            match self
                .parent_id
                .as_deref()
                .and_then(|p| p.trim().parse::<u64>().ok())
            {
                Some(parent_id) => comment.reply_to(parent_id),
                None => comment,
            },
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowQuery {
    pub notice: Option<String>,
    pub preview: Option<String>,
}

impl ShowQuery {
    pub fn is_preview(&self) -> bool {
        self.preview.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `content` from the query string or a JSON body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
}

/// Trimmed, non-empty value of an optional parameter
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> PostForm {
        let mut form = PostForm::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "_method" => form.method = value,
                "title" => form.title = value,
                "content" => form.content = value,
                "published" => form.published = value,
                "published_field" => form.published_field = value,
                "tags" => form.tags = value,
                "category" => form.category = value,
                _ => {}
            }
        }
        form
    }

    #[test]
    fn test_checkbox_values() {
        assert!(form(&[("published", "on")]).is_published());
        assert!(form(&[("published", "true")]).is_published());
        assert!(!form(&[("published", "off")]).is_published());
        assert!(!form(&[]).is_published());
    }

    #[test]
    fn test_method_override() {
        assert_eq!(form(&[("_method", "DELETE")]).method(), "delete");
        assert_eq!(form(&[]).method(), "post");
    }

    #[test]
    fn test_new_post_from_form() {
        let post = form(&[
            ("title", "  Hello  "),
            ("content", "some content"),
            ("tags", "rust, web,,"),
            ("category", "dev"),
        ])
        .to_new_post();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(post.category, "dev");
        assert!(!post.published);
    }

    #[test]
    fn test_changes_leave_missing_fields() {
        let changes = form(&[("title", "New title")]).to_changes();
        assert_eq!(changes.title.as_deref(), Some("New title"));
        assert!(changes.content.is_none());
        assert!(changes.tags.is_none());
        assert_eq!(changes.published, None);
    }

    #[test]
    fn test_changes_published_flag() {
        let checked = form(&[("published_field", "1"), ("published", "on")]).to_changes();
        assert_eq!(checked.published, Some(true));

        let unchecked = form(&[("published_field", "1")]).to_changes();
        assert_eq!(unchecked.published, Some(false));

        let explicit = form(&[("published", "false")]).to_changes();
        assert_eq!(explicit.published, Some(false));
    }

    #[test]
    fn test_comment_form() {
        let blank = CommentForm {
            comment_content: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.to_new_comment().is_none());

        let reply = CommentForm {
            author: Some("Kim".to_string()),
            comment_content: Some("nice".to_string()),
            parent_id: Some("3".to_string()),
        };
        assert_eq!(
            reply.to_new_comment(),
            Some(NewComment::new("Kim", "nice").reply_to(3))
        );

        let top = CommentForm {
            comment_content: Some("top".to_string()),
            parent_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(top.to_new_comment().unwrap().parent_id, None);
    }
}
