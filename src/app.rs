use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderValue, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Config;
use crate::context::ExAppContext;
use crate::convert;
use crate::error::AppError;
use crate::registration::{self, APP_NAME};
use crate::webdav;

/// Shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            client: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }
}

#[derive(Deserialize)]
struct EnabledQuery {
    enabled: i32,
}

/// Builds the ExApp router
///
/// # Routes
/// * `GET /heartbeat` - Liveness check used by AppAPI
/// * `PUT /enabled?enabled=<0|1>` - Register or unregister the UI entries
/// * `GET /api/webdav/{file_id}` - Workbook in IronCalc's binary format
/// * `POST /files_action_handler` - Target of the "Open with IronCalc" action
/// * `/assets/*` - Static files from the configured assets directory
pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/heartbeat", get(heartbeat))
        .route("/enabled", put(enabled))
        .route("/api/webdav/:file_id", get(get_webdav))
        .route("/files_action_handler", post(files_action_handler))
        .nest_service("/assets", assets)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(config.bind_target()).await?;
    let addr = listener.local_addr()?;
    let app = router(AppState::new(config));

    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn heartbeat() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn enabled(
    ctx: ExAppContext,
    Query(params): Query<EnabledQuery>,
) -> Result<(), AppError> {
    registration::set_enabled(&ctx, params.enabled == 1).await
}

async fn get_webdav(
    ctx: ExAppContext,
    Path(file_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (xlsx_bytes, hit) = webdav::fetch_workbook(&ctx, file_id).await?;
    let model_bytes = convert::xlsx_to_model_bytes(&xlsx_bytes, &hit.displayname)?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        model_bytes,
    ))
}

async fn files_action_handler() -> Json<Value> {
    Json(json!({ "redirect_handler": APP_NAME }))
}

