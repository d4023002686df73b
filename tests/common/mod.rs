//! Shared helpers for the HTTP-level tests.

#![allow(dead_code)]

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::{json, Value};

pub const TEST_API_KEY: &str = "test-key";
pub const BOUNDARY: &str = "xlsxquiz-test-boundary";

/// Write string rows into the first worksheet
pub fn workbook_with_rows(rows: &[&[&str]]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string(row_idx as u32, col_idx as u16, *cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Build a single-part multipart/form-data body
///
/// Returns the `Content-Type` header value and the body bytes.
pub fn multipart_body(field: &str, filename: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Chat-completions stand-in
///
/// Requires `Bearer test-key`; returns no choices when the question contains "nochoice"
/// and includes the correct answer among the choices for questions about France
/// (only the correct answer when the question starts with "echo:").
async fn mock_chat(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TEST_API_KEY}"))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid api key").into_response();
    }

    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    if prompt.contains("nochoice") {
        return Json(json!({ "choices": [] })).into_response();
    }

    let content = if prompt.contains("Question: echo:") {
        "* Paris\n* PARIS \n- paris"
    } else if prompt.contains("France") {
        "* Paris\n* London\n* Berlin\n* Madrid"
    } else {
        "1. Three\n\n2. Five\n* Twenty-two\n* Eleven"
    };

    Json(json!({
        "id": "gen-1",
        "choices": [{
            "message": {
                "role": "assistant",
                "content": content
            }
        }]
    }))
    .into_response()
}

/// Start the mock chat-completions service and return its endpoint URL
pub async fn spawn_mock_chat() -> String {
    let app = Router::new().route("/api/v1/chat/completions", post(mock_chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api/v1/chat/completions")
}
