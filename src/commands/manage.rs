//! Publish and delete posts from the command line

use anyhow::Result;

use crate::Blog;

/// Flip a post between draft and published
pub fn toggle_publish(blog: &Blog, id: u64) -> Result<()> {
    match blog.open_store().toggle_published(id)? {
        Some(post) if post.published => println!("Published post {}: {}", post.id, post.title),
        Some(post) => println!("Unpublished post {}: {}", post.id, post.title),
        None => anyhow::bail!("Post not found: {}", id),
    }
    Ok(())
}

pub fn delete(blog: &Blog, id: u64) -> Result<()> {
    if !blog.open_store().delete(id)? {
        anyhow::bail!("Post not found: {}", id);
    }
    println!("Deleted post {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NewPost;

    #[test]
    fn test_publish_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let store = blog.open_store();
        let post = store.create(NewPost::new("Draft", "not yet public")).unwrap();

        toggle_publish(&blog, post.id).unwrap();
        assert!(store.find_by_id(post.id).unwrap().published);

        delete(&blog, post.id).unwrap();
        assert!(store.find_by_id(post.id).is_none());

        assert!(delete(&blog, post.id).is_err());
        assert!(toggle_publish(&blog, post.id).is_err());
    }
}
