//! Request handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use std::sync::Arc;
use tera::Context;

use super::error::{AppError, AppResult};
use super::forms::{
    non_blank, CommentForm, IndexQuery, NoticeQuery, PostForm, PreviewRequest, PreviewResponse,
    SearchQuery, ShowQuery,
};
use super::AppState;
use crate::content::{sort_newest_first, Post};
use crate::helpers::with_notice;
use crate::store::Store;
use crate::templates::{FormData, PostDetail, PostSummary};

/// Run a store call off the async runtime
async fn blocking<F, R>(state: &Arc<AppState>, f: F) -> AppResult<R>
where
    F: FnOnce(&Store) -> R + Send + 'static,
    R: Send + 'static,
{
    let state = Arc::clone(state);
    Ok(tokio::task::spawn_blocking(move || f(&state.store)).await?)
}

fn render(state: &AppState, template: &str, context: &Context) -> AppResult<String> {
    Ok(state.templates.render(template, context)?)
}

fn redirect(path: &str, notice: &str) -> Response {
    Redirect::to(&with_notice(path, notice)).into_response()
}

fn post_path(id: u64) -> String {
    format!("/posts/{}", id)
}

fn not_found_page(state: &AppState, message: &str) -> AppResult<Response> {
    let mut context = state.templates.context(&state.config, None);
    context.insert("message", message);
    let body = render(state, "not_found.html", &context)?;
    Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
}

fn form_page(state: &AppState, form: &FormData, status: StatusCode) -> AppResult<Response> {
    let mut context = state.templates.context(&state.config, None);
    context.insert("form", form);
    let body = render(state, "form.html", &context)?;
    Ok((status, Html(body)).into_response())
}

/// GET / and GET /posts
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> AppResult<Response> {
    let search = non_blank(&query.search).map(str::to_string);
    let category = non_blank(&query.category).map(str::to_string);
    let tag = non_blank(&query.tag).map(str::to_string);

    let (mut posts, tags, categories) = {
        let (search, category, tag) = (search.clone(), category.clone(), tag.clone());
        blocking(&state, move |store| {
            let posts = if let Some(q) = search.as_deref() {
                store.search(Some(q))
            } else if let Some(c) = category.as_deref() {
                store.posts_by_category(c)
            } else if let Some(t) = tag.as_deref() {
                store.posts_by_tag(t)
            } else {
                store.list_all()
            };
            (posts, store.all_tags(), store.all_categories())
        })
        .await?
    };

    let show_drafts = state.config.show_drafts;
    posts.retain(|p| show_drafts || p.is_published());
    sort_newest_first(&mut posts);
    tracing::debug!("Index lists {} posts", posts.len());

    let summaries: Vec<PostSummary> = posts
        .iter()
        .map(|p| PostSummary::new(p, &state.config))
        .collect();

    let mut context = state.templates.context(&state.config, query.notice.as_deref());
    context.insert("posts", &summaries);
    context.insert("tags", &tags);
    context.insert("categories", &categories);
    context.insert("search", &search.unwrap_or_default());
    context.insert("current_tag", &tag.unwrap_or_default());
    context.insert("current_category", &category.unwrap_or_default());

    Ok(Html(render(&state, "index.html", &context)?).into_response())
}

/// GET /posts/:id
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<ShowQuery>,
) -> AppResult<Response> {
    let Some(post) = blocking(&state, move |store| store.find_by_id(id)).await? else {
        return not_found_page(&state, &format!("Post {} does not exist.", id));
    };

    if post.is_draft() && !state.config.show_drafts && !query.is_preview() {
        return Ok(redirect("/", "This post is not published yet."));
    }

    let detail = PostDetail::new(&post, &state.renderer, &state.config);
    let mut context = state.templates.context(&state.config, query.notice.as_deref());
    context.insert("post", &detail);

    Ok(Html(render(&state, "show.html", &context)?).into_response())
}

/// GET /posts/new and GET /new
pub async fn new_form(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    form_page(&state, &FormData::default(), StatusCode::OK)
}

/// POST /posts
pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let new_post = form.to_new_post();
    let errors = new_post.validate();
    if !errors.is_empty() {
        tracing::debug!("Rejected new post: {:?}", errors.full_messages());
        return form_page(
            &state,
            &form.to_form_data(None).with_errors(errors),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    let post = blocking(&state, move |store| store.create(new_post)).await??;
    Ok(redirect(&post_path(post.id), "Post was successfully created."))
}

/// GET /posts/:id/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<NoticeQuery>,
) -> AppResult<Response> {
    let Some(post) = blocking(&state, move |store| store.find_by_id(id)).await? else {
        return Ok(redirect("/", "Post not found."));
    };

    let mut context = state.templates.context(&state.config, query.notice.as_deref());
    context.insert("form", &FormData::for_post(&post));
    Ok(Html(render(&state, "form.html", &context)?).into_response())
}

/// PUT/PATCH /posts/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let changes = form.to_changes();
    let errors = changes.validate();
    if !errors.is_empty() {
        tracing::debug!("Rejected update of post {}: {:?}", id, errors.full_messages());
        return form_page(
            &state,
            &form.to_form_data(Some(id)).with_errors(errors),
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    match blocking(&state, move |store| store.update(id, changes)).await?? {
        Some(post) => Ok(redirect(&post_path(post.id), "Post was successfully updated.")),
        None => Ok(redirect("/", "Post not found.")),
    }
}

/// DELETE /posts/:id
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    if blocking(&state, move |store| store.delete(id)).await?? {
        Ok(redirect("/", "Post was successfully deleted."))
    } else {
        Ok(redirect("/", "Post not found."))
    }
}

/// POST /posts/:id, dispatched on the `_method` field
pub async fn override_method(
    state: State<Arc<AppState>>,
    path: Path<u64>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    match form.method().as_str() {
        "put" | "patch" => update(state, path, Form(form)).await,
        "delete" => destroy(state, path).await,
        other => Err(AppError::MethodNotAllowed(other.to_string())),
    }
}

/// PATCH /posts/:id/publish
pub async fn toggle_publish(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Response> {
    match blocking(&state, move |store| store.toggle_published(id)).await?? {
        Some(post) if post.published => Ok(redirect(&post_path(id), "Post was published.")),
        Some(_) => Ok(redirect(&post_path(id), "Post was unpublished.")),
        None => Ok(redirect("/", "Post not found.")),
    }
}

/// POST /posts/:id/comments
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let Some(comment) = form.to_new_comment() else {
        return Ok(redirect(&post_path(id), "Comment can't be blank."));
    };

    match blocking(&state, move |store| store.add_comment(id, comment)).await?? {
        Some(_) => Ok(redirect(&post_path(id), "Comment was added.")),
        None => Ok(redirect("/", "Post not found.")),
    }
}

/// GET /api/search?q=
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Post>>> {
    let mut posts = blocking(&state, move |store| store.search(query.q.as_deref())).await?;
    posts.retain(Post::is_published);
    Ok(Json(posts))
}

/// GET /api/preview?content=
pub async fn api_preview(
    State(state): State<Arc<AppState>>,
    Query(request): Query<PreviewRequest>,
) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: state.renderer.render(&request.content),
    })
}

/// POST /api/preview with a JSON body
pub async fn api_preview_json(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreviewRequest>,
) -> Json<PreviewResponse> {
    Json(PreviewResponse {
        html: state.renderer.render(&request.content),
    })
}

pub async fn api_tags(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(blocking(&state, |store| store.all_tags()).await?))
}

pub async fn api_categories(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(blocking(&state, |store| store.all_categories()).await?))
}

pub async fn fallback(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    not_found_page(&state, "The page you were looking for doesn't exist.")
}
