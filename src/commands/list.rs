//! List blog content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::{sort_newest_first, Post};
use crate::helpers::date_part;
use crate::Blog;

fn print_posts(heading: &str, mut posts: Vec<Post>) {
    sort_newest_first(&mut posts);
    println!("{} ({}):", heading, posts.len());
    for post in posts {
        println!(
            "  {:>4}  {} - {} ({} comments)",
            post.id,
            date_part(&post.created_at),
            post.title,
            post.comments.len()
        );
    }
}

/// Count how many posts use each name, most used first
fn counted<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let store = blog.open_store();

    match content_type {
        "post" | "posts" => print_posts("Posts", store.list_published()),
        "draft" | "drafts" => print_posts("Drafts", store.list_drafts()),
        "tag" | "tags" => {
            let posts = store.list_all();
            let tags = counted(posts.iter().flat_map(|p| p.tags.iter().map(String::as_str)));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let posts = store.list_all();
            let categories = counted(
                posts
                    .iter()
                    .map(|p| p.category.as_str())
                    .filter(|c| !c.is_empty()),
            );
            println!("Categories ({}):", categories.len());
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, draft, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
