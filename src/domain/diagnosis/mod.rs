//! Diagnosis Context - 诊断限界上下文
//!
//! 职责:
//! - 候选分类（名称 + 置信度）
//! - 上传图片与预览句柄
//! - 疾病详情的防御性解码
//! - 预测结果（持久化与展示的唯一单元）

mod details;
mod errors;
mod result;
mod value_objects;

pub use details::{decode_details, DiseaseDetails, ReportSection};
pub use errors::{DetailsDecodeError, UploadError};
pub use result::PredictionResult;
pub use value_objects::{
    ConfidenceLevel, ImageFormat, ImageHandle, ImageUpload, PredictionCandidate,
    DEFAULT_MAX_UPLOAD_BYTES,
};
