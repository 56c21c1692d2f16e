//! Seed an empty blog with sample posts

use anyhow::Result;

use crate::content::NewPost;
use crate::Blog;

const WELCOME: &str = r#"# Hello! 👋

Welcome to **mdblog**. Posts are written in markdown and rendered to HTML,
code blocks included.

## What it does

- **Bold** and *italic* text
- `inline code`
- Highlighted code blocks

## Code

```rust
fn main() {
    let posts = store.list_published();
    println!("{} posts", posts.len());
}
```

Now go write something of your own! 🚀
"#;

const GUIDE: &str = r#"# Markdown guide 📖

Markdown is a lightweight text markup language.

## Text

- **bold** (`**bold**`)
- *italic* (`*italic*`)
- `inline code` (wrapped in backticks)

## Lists

1. First
2. Second
3. Third

## Code blocks

```javascript
function greetUser(name) {
  console.log(`Hello, ${name}!`);
}
```

## Quotes

> "Good code is its own best documentation."
"#;

const SETUP: &str = r#"# Setting up a Rust toolchain

This draft walks through installing Rust from scratch.

## 1. Install rustup

```bash
curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh
rustc --version
```

## 2. Create a project

```bash
cargo new my_blog
cd my_blog
```

Happy coding! 🦀
"#;

/// The sample posts written by `mdblog seed`
pub fn sample_posts() -> Vec<NewPost> {
    vec![
        NewPost::new("🚀 Welcome to the markdown blog!", WELCOME)
            .published(true)
            .tags(["welcome", "markdown"])
            .category("General"),
        NewPost::new("📚 A complete markdown guide", GUIDE)
            .published(true)
            .tags(["markdown", "guide"])
            .category("Guides"),
        NewPost::new("🛠️ Setting up a Rust toolchain", SETUP)
            .tags(["rust", "setup"])
            .category("Guides"),
    ]
}

/// Write the sample posts when the store is empty
pub fn run(blog: &Blog) -> Result<()> {
    let created = blog.open_store().seed_if_empty(sample_posts())?;
    if created == 0 {
        println!("Store already has posts, nothing seeded.");
    } else {
        tracing::info!("Seeded {} sample posts into {:?}", created, blog.db_path);
        println!("Created {} sample posts.", created);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid() {
        for sample in sample_posts() {
            assert!(sample.validate().is_empty(), "{}", sample.title);
        }
    }

    #[test]
    fn test_seed_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        run(&blog).unwrap();
        run(&blog).unwrap();

        let store = blog.open_store();
        assert_eq!(store.list_all().len(), 3);
        assert_eq!(store.list_drafts().len(), 1);
    }
}
