//! # Demo Blog Actions
//!
//! A small in-memory blog used by the CLI, the integration tests and the
//! benches. It registers:
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET | `/health` | `health` (void input) |
//! | GET | `/posts` | `listPosts` (`q`, coercing `limit`) |
//! | POST | `/posts` | `createPost` |
//! | GET | `/posts/{postId}` | `getPost` |
//! | PUT | `/posts/{postId}` | `updatePost` |
//! | DELETE | `/posts/{postId}` | `deletePost` |
//!
//! The post store is handed to server code as the action context by the
//! client middleware.

use crate::action::{ActionClient, ActionMetadata, ServerError};
use crate::router::{RouteTable, TemplateError};
use crate::schema::Schema;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// Thread-safe in-memory post storage.
#[derive(Debug)]
pub struct PostStore {
    posts: RwLock<Vec<Post>>,
    next_id: AtomicU64,
}

impl PostStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store pre-filled with two posts (ids `1` and `2`).
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        for (title, body, tags) in [
            ("Hello", "First post", vec!["intro"]),
            ("Routing", "Matching paths by template", vec!["rust", "http"]),
        ] {
            if let Err(e) = store.create(
                title.to_string(),
                body.to_string(),
                tags.into_iter().map(str::to_string).collect(),
            ) {
                warn!(error = %e, title, "Failed to seed post");
            }
        }
        store
    }

    pub fn list(&self, query: Option<&str>, limit: Option<usize>) -> anyhow::Result<Vec<Post>> {
        let posts = self.posts.read().map_err(|_| anyhow!("post store lock poisoned"))?;
        let query = query.map(str::to_lowercase);
        Ok(posts
            .iter()
            .filter(|p| {
                query
                    .as_deref()
                    .map_or(true, |q| {
                        p.title.to_lowercase().contains(q) || p.body.to_lowercase().contains(q)
                    })
            })
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    pub fn get(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let posts = self.posts.read().map_err(|_| anyhow!("post store lock poisoned"))?;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    pub fn create(&self, title: String, body: String, tags: Vec<String>) -> anyhow::Result<Post> {
        let mut posts = self.posts.write().map_err(|_| anyhow!("post store lock poisoned"))?;
        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
            title,
            body,
            tags,
        };
        posts.push(post.clone());
        Ok(post)
    }

    /// Apply the given changes; `Ok(None)` when no post has `id`.
    pub fn update(
        &self,
        id: &str,
        title: Option<String>,
        body: Option<String>,
    ) -> anyhow::Result<Option<Post>> {
        let mut posts = self.posts.write().map_err(|_| anyhow!("post store lock poisoned"))?;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            post.title = title;
        }
        if let Some(body) = body {
            post.body = body;
        }
        Ok(Some(post.clone()))
    }

    /// Remove a post, returning whether it existed.
    pub fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut posts = self.posts.write().map_err(|_| anyhow!("post store lock poisoned"))?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn post_schema() -> Schema {
    Schema::object([
        ("id", Schema::string()),
        ("title", Schema::string()),
        ("body", Schema::string()),
        ("tags", Schema::array(Schema::string())),
    ])
}

fn post_not_found(id: &str) -> anyhow::Error {
    ServerError::new(format!("Post {id} not found"))
        .with_code("NOT_FOUND")
        .with_status(404)
        .into()
}

fn str_field(input: &Value, key: &str) -> Option<String> {
    input.get(key).and_then(Value::as_str).map(str::to_string)
}

fn to_data(value: impl Serialize) -> anyhow::Result<Option<Value>> {
    Ok(Some(serde_json::to_value(value)?))
}

/// Register the blog actions on a table with the given prefix (may be empty).
///
/// # Errors
///
/// Returns [`TemplateError`] if `prefix` turns a route path into an invalid
/// template.
pub fn demo_routes(prefix: &str, store: Arc<PostStore>) -> Result<RouteTable, TemplateError> {
    let client = ActionClient::new().with_middleware(move |_| Ok(Arc::clone(&store)));

    let health = client
        .action(Schema::void(), |_, _| Ok(Some(json!({ "status": "ok" }))))
        .output(Schema::object([("status", Schema::literal("ok"))]))
        .metadata(ActionMetadata::new("health").with_description("Liveness check"));

    let list_posts = client
        .action(
            Schema::object([
                ("q", Schema::string().describe("Case-insensitive text search").optional()),
                ("limit", Schema::integer().coerce().optional()),
            ]),
            |input, store: Arc<PostStore>| {
                let limit = input
                    .get("limit")
                    .and_then(Value::as_u64)
                    .and_then(|l| usize::try_from(l).ok());
                let posts = store.list(input.get("q").and_then(Value::as_str), limit)?;
                debug!(count = posts.len(), "Listing posts");
                to_data(json!({ "posts": posts }))
            },
        )
        .output(Schema::object([("posts", Schema::array(post_schema()))]))
        .metadata(
            ActionMetadata::new("listPosts")
                .with_description("List posts, optionally filtered")
                .with_tags(["posts"]),
        );

    let create_post = client
        .action(
            Schema::object([
                ("title", Schema::string()),
                ("body", Schema::string()),
                ("tags", Schema::array(Schema::string()).default_value(json!([]))),
            ]),
            |input, store: Arc<PostStore>| {
                let tags = serde_json::from_value(input.get("tags").cloned().unwrap_or(json!([])))?;
                let post = store.create(
                    str_field(&input, "title").unwrap_or_default(),
                    str_field(&input, "body").unwrap_or_default(),
                    tags,
                )?;
                to_data(post)
            },
        )
        .output(post_schema())
        .metadata(
            ActionMetadata::new("createPost")
                .with_description("Create a post")
                .with_tags(["posts"]),
        );

    let get_post = client
        .action(
            Schema::object([("postId", Schema::string())]),
            |input, store: Arc<PostStore>| {
                let id = str_field(&input, "postId").unwrap_or_default();
                match store.get(&id)? {
                    Some(post) => to_data(post),
                    None => Err(post_not_found(&id)),
                }
            },
        )
        .output(post_schema())
        .metadata(
            ActionMetadata::new("getPost")
                .with_description("Fetch one post")
                .with_tags(["posts"]),
        );

    let update_post = client
        .action(
            Schema::object([
                ("postId", Schema::string()),
                ("title", Schema::string().optional()),
                ("body", Schema::string().optional()),
            ]),
            |input, store: Arc<PostStore>| {
                let id = str_field(&input, "postId").unwrap_or_default();
                let updated =
                    store.update(&id, str_field(&input, "title"), str_field(&input, "body"))?;
                match updated {
                    Some(post) => to_data(post),
                    None => Err(post_not_found(&id)),
                }
            },
        )
        .output(post_schema())
        .metadata(
            ActionMetadata::new("updatePost")
                .with_description("Edit a post's title or body")
                .with_tags(["posts"]),
        );

    let delete_post = client
        .action(
            Schema::object([("postId", Schema::string())]),
            |input, store: Arc<PostStore>| {
                let id = str_field(&input, "postId").unwrap_or_default();
                if store.delete(&id)? {
                    Ok(None)
                } else {
                    Err(post_not_found(&id))
                }
            },
        )
        .output(Schema::void())
        .metadata(
            ActionMetadata::new("deletePost")
                .with_description("Delete a post")
                .with_tags(["posts"]),
        );

    let mut routes = RouteTable::with_prefix(prefix);
    routes
        .get_action("/health", Arc::new(health))?
        .get_action("/posts", Arc::new(list_posts))?
        .post_action("/posts", Arc::new(create_post))?
        .get_action("/posts/{postId}", Arc::new(get_post))?
        .put_action("/posts/{postId}", Arc::new(update_post))?
        .delete_action("/posts/{postId}", Arc::new(delete_post))?;
    routes.log_loaded();
    Ok(routes)
}
