//! Post store
//!
//! Every operation works on the whole collection: reads load everything,
//! mutations take the writer lock, load, mutate in memory and save the
//! complete collection back. An unreadable collection is treated as empty.

mod backend;
mod error;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use error::{StoreError, StoreResult};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::content::{
    Comment, NewComment, NewPost, Post, PostChanges, ANONYMOUS_AUTHOR,
};
use crate::helpers::Clock;

/// Keyed post storage with the blog's CRUD operations
pub struct Store {
    backend: Box<dyn StorageBackend>,
    clock: Clock,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(backend: impl StorageBackend + 'static, clock: Clock) -> Self {
        Self {
            backend: Box::new(backend),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON file
    pub fn open(path: impl Into<PathBuf>, clock: Clock) -> Self {
        Self::new(JsonFileBackend::new(path), clock)
    }

    /// Store backed by memory only
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(), Clock::default())
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    fn load(&self) -> Vec<Post> {
        match self.backend.load() {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Treating post store as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Load ahead of a write; an unreadable collection is set aside first
    /// so the save that follows does not destroy it
    fn load_for_write(&self) -> Vec<Post> {
        match self.backend.load() {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Treating post store as empty: {}", e);
                match self.backend.set_aside() {
                    Ok(Some(kept)) => tracing::warn!("Kept unreadable posts at {}", kept),
                    Ok(None) => {}
                    Err(e) => tracing::error!("Failed to keep unreadable posts: {}", e),
                }
                Vec::new()
            }
        }
    }

    /// Load, mutate and save under the writer lock
    fn write<R>(&self, f: impl FnOnce(&mut Vec<Post>) -> R) -> StoreResult<R> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut posts = self.load_for_write();
        let result = f(&mut posts);
        self.backend.save(&posts)?;
        Ok(result)
    }

    /// Like [`Store::write`], but nothing is saved when `f` returns `None`
    fn write_if<R>(
        &self,
        f: impl FnOnce(&mut Vec<Post>) -> Option<R>,
    ) -> StoreResult<Option<R>> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut posts = self.load_for_write();
        let Some(result) = f(&mut posts) else {
            return Ok(None);
        };
        self.backend.save(&posts)?;
        Ok(Some(result))
    }

    /// Every post, in persisted order
    pub fn list_all(&self) -> Vec<Post> {
        self.load()
    }

    pub fn list_published(&self) -> Vec<Post> {
        self.load().into_iter().filter(Post::is_published).collect()
    }

    pub fn list_drafts(&self) -> Vec<Post> {
        self.load().into_iter().filter(Post::is_draft).collect()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Post> {
        self.load().into_iter().find(|p| p.id == id)
    }

    /// Create a post with the next id (max existing + 1)
    pub fn create(&self, new_post: NewPost) -> StoreResult<Post> {
        let now = self.clock.now();
        let post = self.write(move |posts| append_post(posts, new_post, now))?;

        tracing::info!("Created post {} ({:?})", post.id, post.title);
        Ok(post)
    }

    /// Overwrite the supplied fields and restamp `updated_at`
    pub fn update(&self, id: u64, changes: PostChanges) -> StoreResult<Option<Post>> {
        let now = self.clock.now();
        let updated = self.write_if(move |posts| {
            let post = posts.iter_mut().find(|p| p.id == id)?;
            post.apply(changes);
            touch(post, now);
            Some(post.clone())
        })?;

        if updated.is_some() {
            tracing::info!("Updated post {}", id);
        }
        Ok(updated)
    }

    /// Flip the published flag
    pub fn toggle_published(&self, id: u64) -> StoreResult<Option<Post>> {
        let now = self.clock.now();
        self.write_if(move |posts| {
            let post = posts.iter_mut().find(|p| p.id == id)?;
            post.published = !post.published;
            touch(post, now);
            Some(post.clone())
        })
    }

    /// Remove a post; returns whether it existed
    pub fn delete(&self, id: u64) -> StoreResult<bool> {
        let removed = self.write_if(|posts| {
            let before = posts.len();
            posts.retain(|p| p.id != id);
            (posts.len() != before).then_some(())
        })?;

        if removed.is_some() {
            tracing::info!("Deleted post {}", id);
        }
        Ok(removed.is_some())
    }

    /// Case-insensitive substring search; a blank query matches nothing
    pub fn search(&self, query: Option<&str>) -> Vec<Post> {
        let needle = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return Vec::new(),
        };
        self.load()
            .into_iter()
            .filter(|p| p.matches(&needle))
            .collect()
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        self.load().into_iter().filter(|p| p.has_tag(tag)).collect()
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<Post> {
        self.load()
            .into_iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Append a comment to a post.
    ///
    /// A blank author becomes [`ANONYMOUS_AUTHOR`]. Replies stay one level
    /// deep: a parent that is itself a reply is replaced by its own parent,
    /// and an unknown parent makes the comment top-level.
    pub fn add_comment(&self, post_id: u64, comment: NewComment) -> StoreResult<Option<Comment>> {
        let now = self.clock.now();
        let added = self.write_if(move |posts| {
            let post = posts.iter_mut().find(|p| p.id == post_id)?;

            let parent_id = comment.parent_id.and_then(|parent_id| {
                match post.find_comment(parent_id) {
                    Some(parent) => Some(parent.parent_id.unwrap_or(parent.id)),
                    None => {
                        tracing::warn!(
                            "Comment parent {} not found on post {}, adding top-level",
                            parent_id,
                            post_id
                        );
                        None
                    }
                }
            });

            let author = comment.author.trim();
            let new_comment = Comment {
                id: next_id(post.comments.iter().map(|c| c.id)),
                author: if author.is_empty() {
                    ANONYMOUS_AUTHOR.to_string()
                } else {
                    author.to_string()
                },
                content: comment.content,
                parent_id,
                created_at: now,
            };
            post.comments.push(new_comment.clone());
            Some(new_comment)
        })?;

        if let Some(c) = &added {
            tracing::info!("Added comment {} to post {}", c.id, post_id);
        }
        Ok(added)
    }

    /// Every tag in use, sorted and de-duplicated
    pub fn all_tags(&self) -> Vec<String> {
        self.load()
            .into_iter()
            .flat_map(|p| p.tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every non-empty category, sorted and de-duplicated
    pub fn all_categories(&self) -> Vec<String> {
        self.load()
            .into_iter()
            .map(|p| p.category)
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Create `samples` only when the store has no posts; returns how many were created
    pub fn seed_if_empty(&self, samples: Vec<NewPost>) -> StoreResult<usize> {
        let now = self.clock.now();
        let created = self.write_if(move |posts| {
            if !posts.is_empty() {
                return None;
            }
            let count = samples.len();
            for sample in samples {
                append_post(posts, sample, now.clone());
            }
            Some(count)
        })?;

        if let Some(count) = created {
            tracing::info!("Seeded {} posts", count);
        }
        Ok(created.unwrap_or(0))
    }
}

/// Push a new post with the next id and both timestamps set to `now`
fn append_post(posts: &mut Vec<Post>, new_post: NewPost, now: String) -> Post {
    let post = Post {
        id: next_id(posts.iter().map(|p| p.id)),
        title: new_post.title,
        content: new_post.content,
        published: new_post.published,
        tags: new_post.tags,
        category: new_post.category,
        comments: Vec::new(),
        created_at: now.clone(),
        updated_at: now,
    };
    posts.push(post.clone());
    post
}

/// Max existing id + 1, starting at 1
fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max + 1)
}

/// Stamp `updated_at` with `now`, never before `created_at`
fn touch(post: &mut Post, now: String) {
    post.updated_at = now;
    if post.updated_at < post.created_at {
        post.updated_at = post.created_at.clone();
    }
}
