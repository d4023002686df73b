//! HTTP Server Module
//!
//! `POST /convert`でアップロードされたスプレッドシートをアウトラインに変換して返す。
//!
//! - 成功: `200 OK`、`{"result": "<outline>"}`
//! - `file`フィールドがない、または読み込めない: `400 Bad Request`（プレーンテキスト）
//! - 変換に失敗: `500 Internal Server Error`（プレーンテキスト）
//!
//! CORSは全オリジンを許可し、`OPTIONS /convert`には空の`200 OK`を返します。

mod config;

pub use config::{ServerConfig, DEFAULT_PORT};

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::DistractorMode;
use crate::builder::ConverterBuilder;
use crate::distractor::OpenRouterGenerator;
use crate::error::{Result, XlsxQuizError};

/// マルチパートフォームのファイルフィールド名
pub const FILE_FIELD: &str = "file";

/// ハンドラー間で共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

/// 変換エンドポイントのレスポンスボディ
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub result: String,
}

/// ハンドラーのエラー
///
/// HTTPステータスとプレーンテキストのエラーメッセージに変換されます。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing 'file' field in upload")]
    MissingFile,

    #[error("Failed to read upload: {0}")]
    Upload(#[from] MultipartError),

    #[error("Failed to process file: {0}")]
    Conversion(#[from] XlsxQuizError),

    #[error("Conversion task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Conversion(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "conversion request failed");
        } else {
            info!(error = %self, "rejected upload");
        }
        (status, self.to_string()).into_response()
    }
}

/// ルーターを構築する
///
/// ボディサイズの上限は`ServerConfig::max_upload_size`です。
pub fn router(config: ServerConfig) -> Router {
    let body_limit = usize::try_from(config.max_upload_size).unwrap_or(usize::MAX);
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/convert", post(convert))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// サーバーを起動し、Ctrl+Cを受け取るまで待ち受ける
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    match &config.openrouter {
        Some(openrouter) => info!(model = %openrouter.model, "distractor generation enabled"),
        None => info!("distractor generation disabled, using spreadsheet answers only"),
    }
    info!("Server running on port {}", config.port);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<ConvertResponse>, ApiError> {
    let bytes = read_file_field(&mut multipart)
        .await?
        .ok_or(ApiError::MissingFile)?;
    info!(bytes = bytes.len(), "received upload");

    let config = Arc::clone(&state.config);
    let result = tokio::task::spawn_blocking(move || convert_upload(&config, bytes)).await??;

    Ok(Json(ConvertResponse { result }))
}

async fn read_file_field(
    multipart: &mut Multipart,
) -> std::result::Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(Some(field.bytes().await?));
        }
    }
    Ok(None)
}

/// アップロードされたバイト列を変換する
///
/// ブロッキング処理（calamineの解析、誤答生成のHTTP呼び出し）を含むため、
/// `spawn_blocking`の中で呼び出します。変換器と生成器はリクエストごとに生成され、
/// この関数を抜けると破棄されます。
fn convert_upload(config: &ServerConfig, bytes: Bytes) -> Result<String> {
    let mut builder = ConverterBuilder::new().with_max_input_size(config.max_upload_size);

    if let Some(openrouter) = &config.openrouter {
        let generator = OpenRouterGenerator::new(openrouter.clone())?;
        builder = builder
            .with_distractor_mode(DistractorMode::Generated)
            .with_distractor_generator(Box::new(generator));
    }

    builder.build()?.convert_to_string(Cursor::new(bytes))
}
