//! Analytics Client Ports - 远端分类 / 详情服务抽象
//!
//! 两个端口分别对应预测接口和详情接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::diagnosis::{ImageUpload, PredictionCandidate};

/// 远端调用错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request timeout")]
    Timeout,

    /// 非 2xx 响应；响应体只用于日志，不保证可解析
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Prediction Client Port
///
/// 上传一张图片，返回服务端排好序的候选列表（原样返回，不做修改）
#[async_trait]
pub trait PredictionClientPort: Send + Sync {
    /// 单次尝试，不重试
    async fn predict(&self, upload: ImageUpload) -> Result<Vec<PredictionCandidate>, ClientError>;
}

/// Details Client Port
///
/// 按候选名称查询详情，返回原始 JSON（可能是双重编码的字符串），
/// 由调用方负责防御性解码
#[async_trait]
pub trait DetailsClientPort: Send + Sync {
    /// 单次尝试，不重试
    async fn fetch_details(&self, name: &str) -> Result<Value, ClientError>;
}
