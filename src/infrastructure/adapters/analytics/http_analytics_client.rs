//! HTTP Analytics Client - 调用远端分析服务
//!
//! 实现 PredictionClientPort 和 DetailsClientPort
//!
//! 外部分析 API:
//! POST {base_url}/analytics/prediction/
//! Request: multipart/form-data，单个图片字段（默认 `image`）
//! Response: {"predictions": [{"name": "...", "confidence": 91.2}, ...]}
//!
//! POST {base_url}/analytics/details/
//! Request: {"name": "..."}  (JSON)
//! Response: 详情对象，或包含详情 JSON 的字符串

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{ClientError, DetailsClientPort, PredictionClientPort};
use crate::domain::diagnosis::{ImageUpload, PredictionCandidate};

/// 详情请求体 (JSON)
#[derive(Debug, Serialize)]
struct DetailsHttpRequest<'a> {
    name: &'a str,
}

/// 预测响应体
#[derive(Debug, Deserialize)]
struct PredictionHttpResponse {
    predictions: Vec<PredictionCandidate>,
}

/// HTTP 分析客户端配置
#[derive(Debug, Clone)]
pub struct HttpAnalyticsClientConfig {
    /// 分析服务基础 URL
    pub base_url: String,
    /// 预测接口路径
    pub prediction_path: String,
    /// 详情接口路径
    pub details_path: String,
    /// multipart 中图片字段名
    pub image_field: String,
    /// 请求超时时间（秒），None 表示客户端不设超时
    pub timeout_secs: Option<u64>,
}

impl Default for HttpAnalyticsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            prediction_path: "/analytics/prediction/".to_string(),
            details_path: "/analytics/details/".to_string(),
            image_field: "image".to_string(),
            timeout_secs: None,
        }
    }
}

impl HttpAnalyticsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// HTTP 分析客户端
///
/// 每次调用只尝试一次，不重试
pub struct HttpAnalyticsClient {
    client: Client,
    config: HttpAnalyticsClientConfig,
}

impl HttpAnalyticsClient {
    /// 创建新的 HTTP 分析客户端
    pub fn new(config: HttpAnalyticsClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取预测 URL
    fn prediction_url(&self) -> String {
        join_url(&self.config.base_url, &self.config.prediction_path)
    }

    /// 获取详情 URL
    fn details_url(&self) -> String {
        join_url(&self.config.base_url, &self.config.details_path)
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Network(format!("Cannot connect to analytics service: {}", e))
    } else {
        ClientError::Network(e.to_string())
    }
}

/// 非 2xx 响应转为错误；响应体只记录日志
async fn ensure_success(response: Response, url: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(url = %url, status = status.as_u16(), body = %body, "Analytics request failed");
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PredictionClientPort for HttpAnalyticsClient {
    async fn predict(&self, upload: ImageUpload) -> Result<Vec<PredictionCandidate>, ClientError> {
        let url = self.prediction_url();
        let file_name = upload.file_name().to_string();
        let mime_type = upload.mime_type();

        tracing::debug!(
            url = %url,
            file_name = %file_name,
            size = upload.len(),
            field = %self.config.image_field,
            "Sending prediction request"
        );

        let part = Part::bytes(upload.into_bytes())
            .file_name(file_name)
            .mime_str(mime_type)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        let form = Form::new().part(self.config.image_field.clone(), part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response, &url).await?;

        let body: PredictionHttpResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse predictions: {}", e)))?;

        tracing::info!(candidates = body.predictions.len(), "Prediction completed");
        Ok(body.predictions)
    }
}

#[async_trait]
impl DetailsClientPort for HttpAnalyticsClient {
    async fn fetch_details(&self, name: &str) -> Result<Value, ClientError> {
        let url = self.details_url();
        tracing::debug!(url = %url, name = %name, "Sending details request");

        let response = self
            .client
            .post(&url)
            .json(&DetailsHttpRequest { name })
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response, &url).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("Failed to read details: {}", e)))?;

        // 非 JSON 响应体原样作为字符串交给调用方解码
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "Details body is not JSON");
                Ok(Value::String(text))
            }
        }
    }
}
