//! プレースホルダーHTTPサービス
//!
//! `GET /api/blur?src=<ref>` にぼかし画像の data URL を返す。

use crate::error::{FolioError, Result};
use crate::placeholder::PlaceholderService;
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use folio_gallery_common::placeholder::{BlurError, BlurResponse, BLUR_ENDPOINT};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// 同じ参照からは常に同じ画像が返るので永続キャッシュさせる
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

#[derive(Debug, Deserialize)]
pub struct BlurQuery {
    src: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    MissingSrc,
    Generate(FolioError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingSrc => (StatusCode::BAD_REQUEST, "Missing src query param"),
            ApiError::Generate(e) => {
                error!("Blur placeholder generation failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate blur placeholder")
            }
        };

        (status, Json(BlurError { error: message.to_string() })).into_response()
    }
}

pub fn router(service: Arc<PlaceholderService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(BLUR_ENDPOINT, get(blur_handler))
        .layer(cors)
        .with_state(service)
}

async fn blur_handler(
    State(service): State<Arc<PlaceholderService>>,
    Query(query): Query<BlurQuery>,
) -> std::result::Result<Response, ApiError> {
    let src = query
        .src
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::MissingSrc)?;

    tracing::debug!(src = %src, "blur request");

    // 画像デコードは重いのでブロッキングスレッドで
    let blur_data_url = tokio::task::spawn_blocking(move || service.blur_data_url(&src))
        .await
        .map_err(|e| ApiError::Generate(FolioError::Server(e.to_string())))?
        .map_err(ApiError::Generate)?;

    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE)],
        Json(BlurResponse { blur_data_url }),
    )
        .into_response())
}

/// 指定ポートで起動し、Ctrl+C で停止する
pub async fn serve(service: Arc<PlaceholderService>, port: u16) -> Result<()> {
    let address = format!("0.0.0.0:{port}");
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!(media_root = %service.media_root().display(), "Placeholder server running on {address}");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FolioError::Server(e.to_string()))?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
