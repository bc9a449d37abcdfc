//! In-Memory State Storage Implementation

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{
    decode_persisted, encode_persisted, PersistedState, StateStoragePort, StorageError,
};

/// 内存状态存储
///
/// 以 JSON 文本保存，与持久化实现的落盘格式一致
#[derive(Default)]
pub struct InMemoryStateStorage {
    entry: Mutex<Option<String>>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有的 JSON 条目初始化（模拟上次会话留下的数据）
    pub fn with_entry(json: String) -> Self {
        Self {
            entry: Mutex::new(Some(json)),
            ..Default::default()
        }
    }

    /// 之后所有写入都失败
    pub fn with_failing_saves(self) -> Self {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前保存的原始 JSON
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().ok().and_then(|entry| entry.clone())
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    fn lock_error() -> StorageError {
        StorageError::IoError("state storage lock poisoned".to_string())
    }
}

#[async_trait]
impl StateStoragePort for InMemoryStateStorage {
    async fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        match self.raw() {
            Some(json) => decode_persisted(json.as_bytes()),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::IoError("storage unavailable".to_string()));
        }

        let bytes = encode_persisted(state)?;
        let json = String::from_utf8(bytes)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        *self.entry.lock().map_err(|_| Self::lock_error())? = Some(json);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnosis::ImageHandle;

    #[tokio::test]
    async fn test_storage_lifecycle() {
        let storage = InMemoryStateStorage::new();
        assert!(storage.load().await.unwrap().is_none());

        let state = PersistedState {
            prediction_result: None,
            uploaded_image_url: Some(ImageHandle::new("blob:x")),
        };
        storage.save(&state).await.unwrap();
        storage.save(&state).await.unwrap();

        assert_eq!(storage.save_count(), 2);
        assert_eq!(storage.load().await.unwrap(), Some(state));
        assert!(storage.raw().unwrap().contains("\"uploadedImageUrl\":\"blob:x\""));
    }

    #[tokio::test]
    async fn test_failing_saves() {
        let storage = InMemoryStateStorage::new().with_failing_saves();
        let result = storage.save(&PersistedState::default()).await;
        assert!(matches!(result, Err(StorageError::IoError(_))));
        assert_eq!(storage.save_count(), 0);
    }
}
