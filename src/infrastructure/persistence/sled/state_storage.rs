//! Sled-based Prediction State Storage

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    decode_persisted, encode_persisted, PersistedState, StateStoragePort, StorageError,
};

/// Sled 存储配置
#[derive(Debug, Clone)]
pub struct SledStateConfig {
    /// 数据库路径
    pub db_path: String,
    /// 命名空间 key
    pub key: String,
}

/// Sled 预测状态存储
///
/// 单个 key 下保存 JSON 信封 `{ "state": {...}, "version": 0 }`
pub struct SledStateStorage {
    db: Db,
    key: String,
}

impl SledStateStorage {
    /// 打开（或创建）存储
    pub fn new(config: &SledStateConfig) -> Result<Self, StorageError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            key = %config.key,
            "SledStateStorage initialized"
        );

        Ok(Self {
            db,
            key: config.key.clone(),
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, key: impl Into<String>) -> Result<Self, StorageError> {
        let config = SledStateConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
            key: key.into(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl StateStoragePort for SledStateStorage {
    async fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        match self.db.get(&self.key) {
            Ok(Some(data)) => decode_persisted(&data),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::DatabaseError(e.to_string())),
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let bytes = encode_persisted(state)?;
        self.db
            .insert(self.key.as_bytes(), bytes)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        tracing::debug!(
            key = %self.key,
            has_result = state.prediction_result.is_some(),
            "Prediction state persisted"
        );
        Ok(())
    }

    async fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush_async()
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
