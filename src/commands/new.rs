//! Create a new post

use anyhow::Result;

use crate::content::{NewPost, Post};
use crate::helpers::parse_tags;
use crate::Blog;

/// Options for a post created from the command line
#[derive(Debug, Clone, Default)]
pub struct NewPostOptions {
    pub content: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    pub category: Option<String>,
    pub publish: bool,
}

/// Body used when no content is given
fn scaffold(title: &str) -> String {
    format!("# {}\n\nWrite your post here.\n", title)
}

/// Create a post in the blog's store
pub fn create_post(blog: &Blog, title: &str, options: NewPostOptions) -> Result<Post> {
    let new_post = NewPost {
        title: title.trim().to_string(),
        content: options.content.unwrap_or_else(|| scaffold(title.trim())),
        published: options.publish,
        tags: options.tags.as_deref().map(parse_tags).unwrap_or_default(),
        category: options.category.unwrap_or_default().trim().to_string(),
    };

    let errors = new_post.validate();
    if !errors.is_empty() {
        anyhow::bail!("Invalid post: {}", errors.full_messages().join(", "));
    }

    let post = blog.open_store().create(new_post)?;
    println!(
        "Created {} {}: {}",
        if post.published { "post" } else { "draft" },
        post.id,
        post.title
    );
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_with_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let post = create_post(
            &blog,
            "Hello",
            NewPostOptions {
                tags: Some("rust, cli".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(post.id, 1);
        assert!(post.is_draft());
        assert!(post.content.starts_with("# Hello"));
        assert_eq!(post.tags, vec!["rust", "cli"]);
        assert!(blog.db_path.exists());
    }

    #[test]
    fn test_create_post_rejects_short_content() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let err = create_post(
            &blog,
            "Hello",
            NewPostOptions {
                content: Some("tiny".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("Content is too short"));
        assert!(blog.open_store().list_all().is_empty());
    }
}
