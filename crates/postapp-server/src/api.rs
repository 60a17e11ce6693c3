use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use postapp_shared::constants::APP_NAME;
use postapp_shared::{NewPost, PostId, PostRecord};
use postapp_store::{Database, StoreError};

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    name: &'static str,
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: bool,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        name: APP_NAME,
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostRecord>>, ServerError> {
    let posts = state.db.lock().await.list_posts()?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<PostRecord>, ServerError> {
    let post = state.db.lock().await.get_post(id).map_err(|e| match e {
        StoreError::NotFound => ServerError::PostNotFound(id),
        other => other.into(),
    })?;
    Ok(Json(post))
}

async fn create_post(
    State(state): State<AppState>,
    Json(post): Json<PostRecord>,
) -> Result<(StatusCode, Json<PostRecord>), ServerError> {
    validate(&post)?;

    state.db.lock().await.insert_post(&post).map_err(|e| match e {
        StoreError::Conflict => ServerError::PostExists(post.id),
        other => other.into(),
    })?;

    info!(id = %post.id, rich_text = post.has_rich_text(), "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Json(post): Json<PostRecord>,
) -> Result<Json<PostRecord>, ServerError> {
    if post.id != id {
        return Err(ServerError::BadRequest(format!(
            "Body id {} does not match path id {id}",
            post.id
        )));
    }
    validate(&post)?;

    let db = state.db.lock().await;
    if !db.update_post(&post)? {
        return Err(ServerError::PostNotFound(id));
    }
    // created_at is immutable; return the stored row.
    let stored = db.get_post(id)?;

    info!(id = %id, "Post updated");
    Ok(Json(stored))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<DeleteResponse>, ServerError> {
    let deleted = state.db.lock().await.delete_post(id)?;
    if deleted {
        info!(id = %id, "Post deleted");
    }
    Ok(Json(DeleteResponse { deleted }))
}

/// Same content rules the client applies before publishing.
fn validate(post: &PostRecord) -> Result<(), ServerError> {
    let content = NewPost {
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        body: post.body.clone(),
        html_body: None,
    };
    content.validate()?;
    Ok(())
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(state, listener).await
}

/// Serve on an already bound listener. Lets callers bind port 0 and read
/// the assigned address first.
pub async fn serve_listener(state: AppState, listener: TcpListener) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %listener.local_addr()?, "Starting HTTP API server");

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{Duration, SubsecRound, Utc};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let db = Database::open_in_memory().unwrap();
        build_router(AppState::new(db, ServerConfig::default()))
    }

    fn post(title: &str, age_hours: i64) -> PostRecord {
        PostRecord {
            created_at: (Utc::now() - Duration::hours(age_hours)).trunc_subsecs(6),
            ..PostRecord::new(title, "subtitle", "body", None)
        }
    }

    fn json_request(method: &str, uri: &str, body: &impl Serialize) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["name"], "PostApp");
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let app = app();
        let older = post("older", 3);
        let newer = post("newer", 1);

        for p in [&older, &newer] {
            let (status, _) = send(&app, json_request("POST", "/posts", p)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, empty_request("GET", "/posts")).await;
        assert_eq!(status, StatusCode::OK);
        let posts: Vec<PostRecord> = serde_json::from_value(body).unwrap();
        assert_eq!(posts, vec![newer, older]);
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let uri = format!("/posts/{}", PostId::new());
        let (status, body) = send(&app(), empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let app = app();
        let p = post("once", 0);
        send(&app, json_request("POST", "/posts", &p)).await;
        let (status, _) = send(&app, json_request("POST", "/posts", &p)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_title_is_bad_request() {
        let p = post("   ", 0);
        let (status, body) = send(&app(), json_request("POST", "/posts", &p)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_html_body_stored_verbatim() {
        let app = app();
        let html = "<script>alert(1)</script><p style=\"x\">Hi</p>";
        let p = PostRecord {
            html_body: Some(html.to_string()),
            ..post("rich", 0)
        };
        send(&app, json_request("POST", "/posts", &p)).await;

        let (_, body) = send(&app, empty_request("GET", &format!("/posts/{}", p.id))).await;
        assert_eq!(body["html_body"], html);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let app = app();
        let original = post("draft", 2);
        send(&app, json_request("POST", "/posts", &original)).await;

        let edited = PostRecord {
            title: "final".into(),
            created_at: Utc::now().trunc_subsecs(6),
            ..original.clone()
        };
        let uri = format!("/posts/{}", original.id);
        let (status, body) = send(&app, json_request("PUT", &uri, &edited)).await;
        assert_eq!(status, StatusCode::OK);

        let stored: PostRecord = serde_json::from_value(body).unwrap();
        assert_eq!(stored.title, "final");
        assert_eq!(stored.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_update_rejects_missing_and_mismatched() {
        let app = app();
        let p = post("ghost", 0);
        let uri = format!("/posts/{}", p.id);
        let (status, _) = send(&app, json_request("PUT", &uri, &p)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let other = format!("/posts/{}", PostId::new());
        let (status, _) = send(&app, json_request("PUT", &other, &p)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let app = app();
        let p = post("bye", 0);
        send(&app, json_request("POST", "/posts", &p)).await;
        let uri = format!("/posts/{}", p.id);

        let (_, body) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(body["deleted"], true);
        let (_, body) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(body["deleted"], false);
    }
}
