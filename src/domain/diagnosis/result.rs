//! Diagnosis Context - 预测结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DiseaseDetails, ImageHandle, PredictionCandidate};

/// 预测结果
///
/// 不变量:
/// - `predictions` 至少包含一个候选
/// - `details` 总是已解码的映射，从不是原始字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PredictionResultRecord")]
pub struct PredictionResult {
    image: ImageHandle,
    predictions: Vec<PredictionCandidate>,
    details: DiseaseDetails,
    created_at: DateTime<Utc>,
}

impl PredictionResult {
    /// 组合结果；候选为空时返回 None
    pub fn new(
        image: ImageHandle,
        predictions: Vec<PredictionCandidate>,
        details: DiseaseDetails,
    ) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }
        Some(Self {
            image,
            predictions,
            details,
            created_at: Utc::now(),
        })
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn predictions(&self) -> &[PredictionCandidate] {
        &self.predictions
    }

    /// 排名第一的候选
    pub fn top_candidate(&self) -> &PredictionCandidate {
        &self.predictions[0]
    }

    pub fn details(&self) -> &DiseaseDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 反序列化中间形态，用于在加载时重新校验不变量
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictionResultRecord {
    image: ImageHandle,
    predictions: Vec<PredictionCandidate>,
    #[serde(default)]
    details: DiseaseDetails,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl TryFrom<PredictionResultRecord> for PredictionResult {
    type Error = String;

    fn try_from(record: PredictionResultRecord) -> Result<Self, Self::Error> {
        if record.predictions.is_empty() {
            return Err("prediction result has no candidates".to_string());
        }
        Ok(Self {
            image: record.image,
            predictions: record.predictions,
            details: record.details,
            created_at: record.created_at,
        })
    }
}
