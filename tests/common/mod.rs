//! 模拟分析服务
//!
//! 预测接口按上传文件名（去扩展名）选择响应，详情接口按候选名选择响应

#![allow(dead_code)]

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// 服务端收到的上传
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Clone, Default)]
pub struct MockAnalytics {
    pub uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    pub details_requests: Arc<Mutex<Vec<String>>>,
}

impl MockAnalytics {
    pub async fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().await.clone()
    }

    pub async fn details_requests(&self) -> Vec<String> {
        self.details_requests.lock().await.clone()
    }
}

/// 启动模拟服务，返回 base URL
pub async fn spawn_analytics_server() -> anyhow::Result<(String, MockAnalytics)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockAnalytics::default();

    let app = Router::new()
        .route("/analytics/prediction/", post(handle_prediction))
        .route("/analytics/details/", post(handle_details))
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

/// 一个已关闭端口的 base URL
pub async fn unreachable_base_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

async fn handle_prediction(State(state): State<MockAnalytics>, mut multipart: Multipart) -> Response {
    let mut stem = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await.unwrap_or_default();

        if name == "image" {
            stem = file_name
                .as_deref()
                .and_then(|f| f.rsplit_once('.').map(|(s, _)| s.to_string()));
        }
        state.uploads.lock().await.push(RecordedUpload {
            field: name,
            file_name,
            content_type,
            size: bytes.len(),
        });
    }

    let predictions = match stem.as_deref() {
        Some("eczema") => json!([
            {"name": "Eczema", "confidence": 91.2},
            {"name": "Psoriasis", "confidence": 5.1}
        ]),
        Some("psoriasis") => json!([
            {"name": "Psoriasis", "confidence": 80.0},
            {"name": "Eczema", "confidence": 10.0}
        ]),
        Some("rosacea") => json!([{"name": "Rosacea", "confidence": 60.0}]),
        Some("mystery") => json!([{"name": "Mystery", "confidence": 40.0}]),
        Some("empty") => json!([]),
        Some("fail") => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model offline").into_response();
        }
        _ => return (StatusCode::BAD_REQUEST, "No image uploaded").into_response(),
    };

    Json(json!({ "predictions": predictions })).into_response()
}

async fn handle_details(State(state): State<MockAnalytics>, Json(body): Json<Value>) -> Response {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    state.details_requests.lock().await.push(name.clone());

    match name.as_str() {
        "Eczema" => Json(json!({
            "overview": "Chronic inflammation of the skin",
            "symptoms": ["itching", "redness"],
            "causes": ["genetics"],
            "home_remedy": ["Moisturize daily"],
            "treatment": ["Topical steroids"]
        }))
        .into_response(),
        // 双重编码：JSON 字符串里是详情 JSON
        "Psoriasis" => Json(Value::String(
            json!({"symptoms": ["scaly patches"], "treatment": ["Phototherapy"]}).to_string(),
        ))
        .into_response(),
        "Rosacea" => (StatusCode::OK, "Details unavailable").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "lookup failed").into_response(),
    }
}

pub fn upload(file_name: &str) -> dermai::domain::diagnosis::ImageUpload {
    dermai::domain::diagnosis::ImageUpload::new(file_name, vec![0x89, b'P', b'N', b'G', 1, 2, 3], 1024)
        .expect("valid upload")
}
