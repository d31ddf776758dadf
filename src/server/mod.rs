//! Read-only JSON API over the content repository

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{ContentRepository, Document};
use crate::{Error, Folio};

/// Server state
struct ServerState {
    repo: ContentRepository,
}

#[derive(Debug, Deserialize)]
struct PostQuery {
    tag: Option<String>,
}

/// Failure modes surfaced to HTTP clients
#[derive(Debug)]
enum ApiError {
    NotFound,
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        tracing::error!("Content error: {}", e);
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Build the API router for a repository
pub fn router(repo: ContentRepository) -> Router {
    let state = Arc::new(ServerState { repo });

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/tags", get(list_tags))
        .fallback(|| async { ApiError::NotFound })
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio.repository());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {:?} at http://{}:{}/api/posts", folio.content_dir, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a repository call off the async runtime
async fn blocking<T, F>(state: &Arc<ServerState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&ContentRepository) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.repo))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let posts = blocking(&state, move |repo| match query.tag {
        Some(tag) => repo.list_by_tag(&tag),
        None => repo.list_all(),
    })
    .await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let post = blocking(&state, move |repo| {
        let Some(mut post) = repo.get_by_id(&id)? else {
            return Ok(None);
        };
        post.render(repo.renderer())?;
        Ok(Some(post))
    })
    .await?;

    post.map(Json).ok_or(ApiError::NotFound)
}

async fn list_tags(State(state): State<Arc<ServerState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(blocking(&state, |repo| repo.list_all_tags()).await?))
}
