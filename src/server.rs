use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{
    ConfirmRequest, ConfirmResponse, MessageResponse, MetaResponse, PathRequest, StatusResponse,
    WriteRequest,
};
use crate::config::Config;
use crate::confine::BaseRoot;
use crate::errors::AppError;
use crate::fsops::{self, CreateOutcome};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub base: Arc<BaseRoot>,
}

pub async fn serve(cfg: Config, base: BaseRoot) -> anyhow::Result<()> {
    let shared = AppState {
        cfg: Arc::new(cfg),
        base: Arc::new(base),
    };
    let app = build_router(shared.clone());

    let addr = format!("{}:{}", shared.cfg.server.bind_addr, shared.cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, base_dir = %shared.base.as_path().display(), "listening");
    if shared.cfg.server.open_browser {
        spawn_browser_opener(format!("http://{local}/"));
    }
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(shared: AppState) -> Router {
    let limit_bytes = shared.cfg.limits.max_request_kb * 1024;
    Router::new()
        .route("/", get(index))
        .route("/api/meta", get(meta))
        .route("/api/confirm", post(confirm))
        .route("/api/status", post(status))
        .route("/api/create", post(create))
        .route("/api/write", post(write))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

fn spawn_browser_opener(url: String) {
    tokio::spawn(async move {
        // let the accept loop come up before the first request lands
        tokio::time::sleep(Duration::from_millis(400)).await;
        if let Err(err) = webbrowser::open(&url) {
            warn!(%url, error = %err, "could not open browser");
        }
    });
}

async fn index() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Html(INDEX_HTML))
}

async fn meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(MetaResponse {
        base_dir: state.base.as_path().display().to_string(),
    })
}

async fn confirm(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = payload.map_err(AppError::from).and_then(|Json(req)| {
        let confirmed = state.base.confirm(&req.relative_path)?;
        Ok(ConfirmResponse {
            message: "Path confirmed.",
            relative_path: confirmed.relative.display().to_string(),
            full_path: confirmed.confined.to_string(),
        })
    });
    respond("confirm", started, result)
}

async fn status(
    State(state): State<AppState>,
    payload: Result<Json<PathRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = payload.map_err(AppError::from).and_then(|Json(req)| {
        let path = state.base.require_within(&req.full_path)?;
        let class = fsops::probe(&path);
        Ok(StatusResponse {
            exists: class.exists(),
            kind: class.kind(),
        })
    });
    respond("status", started, result)
}

async fn create(
    State(state): State<AppState>,
    payload: Result<Json<PathRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = payload.map_err(AppError::from).and_then(|Json(req)| {
        let path = state.base.require_within(&req.full_path)?;
        let outcome = fsops::create_empty(&path)?;
        Ok(MessageResponse {
            message: match outcome {
                CreateOutcome::Created => "File created.",
                CreateOutcome::AlreadyExists => "File already exists.",
            },
        })
    });
    respond("create", started, result)
}

async fn write(
    State(state): State<AppState>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let result = payload.map_err(AppError::from).and_then(|Json(req)| {
        let path = state.base.require_within(&req.full_path)?;
        fsops::write_contents(&path, &req.content)?;
        Ok(MessageResponse {
            message: "Content written to file.",
        })
    });
    respond("write", started, result)
}

async fn not_found() -> Response {
    AppError::NotFound.into_response()
}

fn respond<T: Serialize>(op: &'static str, started: Instant, result: Result<T, AppError>) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let duration_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(body) => {
            info!(request_id = %request_id, op, decision = "allow", code = "OK", duration_ms, "audit");
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            info!(request_id = %request_id, op, decision = "deny", code = err.code(), duration_ms, "audit");
            err.into_response()
        }
    }
}
