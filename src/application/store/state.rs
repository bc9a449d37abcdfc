//! Orchestration State

use serde::{Deserialize, Serialize};

use crate::application::ports::PersistedState;
use crate::domain::diagnosis::{ImageHandle, PredictionResult};

/// 编排状态
///
/// 一个周期结束时要么 `prediction_result` 有值且 `error` 为空，
/// 要么 `error` 有值且 `prediction_result` 为空
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestrationState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub prediction_result: Option<PredictionResult>,
    pub uploaded_image_url: Option<ImageHandle>,
}

impl OrchestrationState {
    /// 从持久化切片恢复；loading / error 总是重置
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            is_loading: false,
            error: None,
            prediction_result: persisted.prediction_result,
            uploaded_image_url: persisted.uploaded_image_url,
        }
    }

    /// 需要持久化的切片
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            prediction_result: self.prediction_result.clone(),
            uploaded_image_url: self.uploaded_image_url.clone(),
        }
    }

    pub fn phase(&self) -> CyclePhase {
        if self.is_loading {
            CyclePhase::Loading
        } else if self.error.is_some() {
            CyclePhase::Failed
        } else if self.prediction_result.is_some() {
            CyclePhase::Success
        } else {
            CyclePhase::Idle
        }
    }
}

/// 周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// 周期重叠时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyPolicy {
    /// loading 期间拒绝新周期
    #[default]
    Reject,
    /// 不加保护，重叠周期竞争写入，最后完成者生效
    LastWriterWins,
}

/// Store 配置
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub concurrency: ConcurrencyPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnosis::{DiseaseDetails, PredictionCandidate};

    #[test]
    fn test_phase_derivation() {
        let mut state = OrchestrationState::default();
        assert_eq!(state.phase(), CyclePhase::Idle);

        state.is_loading = true;
        assert_eq!(state.phase(), CyclePhase::Loading);

        state.is_loading = false;
        state.error = Some("Failed to get disease prediction.".to_string());
        assert_eq!(state.phase(), CyclePhase::Failed);

        state.error = None;
        state.prediction_result = PredictionResult::new(
            ImageHandle::new("blob:x"),
            vec![PredictionCandidate::new("Eczema", 91.2)],
            DiseaseDetails::default(),
        );
        assert_eq!(state.phase(), CyclePhase::Success);
    }

    #[test]
    fn test_from_persisted_resets_transient_fields() {
        let persisted = PersistedState {
            prediction_result: None,
            uploaded_image_url: Some(ImageHandle::new("blob:x")),
        };
        let state = OrchestrationState::from_persisted(persisted.clone());
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.persisted(), persisted);
    }
}
