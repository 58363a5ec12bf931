// src/api.rs
//! HTTP read API over the post store. Every request re-reads the store file,
//! so a sync finishing in another process is visible immediately.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::blog::BlogIndex;
use crate::model::NormalizedPost;
use crate::store::PostStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<PostStore>,
    author_profile_url: Arc<str>,
}

impl AppState {
    pub fn new(store: PostStore, author_profile_url: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(store),
            author_profile_url: author_profile_url.into(),
        }
    }

    async fn index(&self) -> BlogIndex {
        BlogIndex::load(&self.store, &self.author_profile_url).await
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/medium-posts", get(list_posts))
        .route("/api/medium-posts/{slug}", get(get_post))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, serde::Deserialize)]
struct ListParams {
    category: Option<String>,
    limit: Option<String>,
}

#[derive(serde::Serialize)]
struct ListOut {
    posts: Vec<NormalizedPost>,
    categories: Vec<String>,
}

fn error_json(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

async fn list_posts(State(state): State<AppState>, Query(q): Query<ListParams>) -> Response {
    let idx = state.index().await;

    if let Some(category) = q.category.as_deref().filter(|c| !c.is_empty()) {
        return Json(idx.by_category(category)).into_response();
    }

    if let Some(raw) = q.limit.as_deref().filter(|l| !l.is_empty()) {
        let Ok(limit) = raw.trim().parse::<i64>() else {
            tracing::debug!(target: "api", limit = raw, "rejecting non-numeric limit");
            return error_json(StatusCode::BAD_REQUEST, "limit must be an integer");
        };
        return Json(idx.head(limit).to_vec()).into_response();
    }

    let categories = idx.categories();
    Json(ListOut {
        posts: idx.into_posts(),
        categories,
    })
    .into_response()
}

async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let idx = state.index().await;
    match idx.by_slug(&slug) {
        Some(p) => Json(p.clone()).into_response(),
        None => error_json(StatusCode::NOT_FOUND, "Post not found"),
    }
}
