//! Render a markdown file to HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::Blog;

/// Render `file` with the blog's markdown settings
pub fn render_file(blog: &Blog, file: &Path) -> Result<String> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read markdown file: {:?}", file))?;
    tracing::debug!("Rendering {:?} ({} bytes)", file, source.len());
    Ok(blog.renderer().render(&source))
}

pub fn run(blog: &Blog, file: &Path) -> Result<()> {
    println!("{}", render_file(blog, file)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.md");
        fs::write(&file, "# Hello\n\n- one\n- two\n").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let html = render_file(&blog, &file).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<ul>"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(render_file(&blog, &dir.path().join("nope.md")).is_err());
    }
}
