//! State Storage Port - 预测状态持久化
//!
//! 只持久化 `{ predictionResult, uploadedImageUrl }`，加载状态与错误从不落盘

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::diagnosis::{ImageHandle, PredictionResult};

/// 当前持久化格式版本
pub const PERSISTED_STATE_VERSION: u32 = 0;

/// Storage 错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 持久化的状态切片
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub prediction_result: Option<PredictionResult>,
    #[serde(default)]
    pub uploaded_image_url: Option<ImageHandle>,
}

/// 落盘格式 `{ "state": {...}, "version": 0 }`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// 编码为 JSON 字节
pub fn encode_persisted(state: &PersistedState) -> Result<Vec<u8>, StorageError> {
    let envelope = PersistedEnvelope {
        state: state.clone(),
        version: PERSISTED_STATE_VERSION,
    };
    serde_json::to_vec(&envelope).map_err(|e| StorageError::SerializationError(e.to_string()))
}

/// 从 JSON 字节解码
///
/// 版本不匹配时返回 `Ok(None)`，视为没有持久化状态
pub fn decode_persisted(bytes: &[u8]) -> Result<Option<PersistedState>, StorageError> {
    let envelope: PersistedEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    if envelope.version != PERSISTED_STATE_VERSION {
        tracing::warn!(
            found = envelope.version,
            expected = PERSISTED_STATE_VERSION,
            "Discarding persisted state with unknown version"
        );
        return Ok(None);
    }
    Ok(Some(envelope.state))
}

/// State Storage Port
///
/// 单个命名空间 key 下的持久化条目
#[async_trait]
pub trait StateStoragePort: Send + Sync {
    /// 读取持久化状态，不存在时返回 None
    async fn load(&self) -> Result<Option<PersistedState>, StorageError>;

    /// 覆盖写入持久化状态
    async fn save(&self, state: &PersistedState) -> Result<(), StorageError>;

    /// 刷新到持久介质
    async fn flush(&self) -> Result<(), StorageError> {
        Ok(()) // 默认实现
    }
}
