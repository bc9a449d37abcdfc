//! 应用层错误定义
//!
//! 预测周期的错误分类：会中止周期并展示给用户的错误。
//! 详情解码失败（`DetailsDecodeError`）在周期内被吞掉，不在此列。

use thiserror::Error;

use crate::application::ports::ClientError;

/// 失败所在阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Prediction,
    Details,
}

impl CycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStage::Prediction => "prediction",
            CycleStage::Details => "details",
        }
    }
}

/// 预测周期错误
///
/// `Display` 文本即写入 `OrchestrationState::error` 的用户可见消息
#[derive(Debug, Error)]
pub enum CycleError {
    /// 预测接口返回非 2xx 或不可用
    #[error("Failed to get disease prediction.")]
    PredictionFailed(#[source] ClientError),

    /// 预测接口成功但没有候选
    #[error("Failed to get disease prediction: no candidates returned.")]
    NoCandidates,

    /// 详情接口返回非 2xx 或不可用
    #[error("Failed to get additional details.")]
    DetailsFailed(#[source] ClientError),

    /// 已有周期在进行中（并发保护拒绝）
    #[error("A prediction is already in progress.")]
    CycleInProgress,
}

impl CycleError {
    /// 失败阶段；并发拒绝不属于任何阶段
    pub fn stage(&self) -> Option<CycleStage> {
        match self {
            CycleError::PredictionFailed(_) | CycleError::NoCandidates => {
                Some(CycleStage::Prediction)
            }
            CycleError::DetailsFailed(_) => Some(CycleStage::Details),
            CycleError::CycleInProgress => None,
        }
    }
}
