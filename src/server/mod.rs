//! Blog web server

mod error;
mod forms;
mod handlers;

pub use error::{AppError, AppResult};
pub use forms::{PreviewRequest, PreviewResponse};

use anyhow::Result;
use axum::routing::{get, patch, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::MarkdownRenderer;
use crate::store::Store;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Store,
    pub renderer: MarkdownRenderer,
    pub templates: TemplateRenderer,
    pub config: SiteConfig,
}

impl AppState {
    pub fn new(store: Store, renderer: MarkdownRenderer, config: SiteConfig) -> Result<Self> {
        Ok(Self {
            store,
            renderer,
            templates: TemplateRenderer::new()?,
            config,
        })
    }

    pub fn from_blog(blog: &Blog) -> Result<Self> {
        Self::new(blog.open_store(), blog.renderer(), blog.config.clone())
    }
}

/// Build the router with every blog route
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/posts", get(handlers::index).post(handlers::create))
        .route("/new", get(handlers::new_form))
        .route("/posts/new", get(handlers::new_form))
        .route(
            "/posts/:id",
            get(handlers::show)
                .post(handlers::override_method)
                .put(handlers::update)
                .patch(handlers::update)
                .delete(handlers::destroy),
        )
        .route("/posts/:id/edit", get(handlers::edit_form))
        .route(
            "/posts/:id/publish",
            patch(handlers::toggle_publish).post(handlers::toggle_publish),
        )
        .route("/posts/:id/comments", post(handlers::add_comment))
        .route("/api/search", get(handlers::api_search))
        .route(
            "/api/preview",
            get(handlers::api_preview).post(handlers::api_preview_json),
        )
        .route("/api/tags", get(handlers::api_tags))
        .route("/api/categories", get(handlers::api_categories))
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_blog(blog)?);
    tracing::info!("Serving posts from {}", state.store.describe());

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
