//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Diagnosis Context: 皮肤病预测与疾病详情

pub mod diagnosis;
