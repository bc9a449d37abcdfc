//! DermAI - 皮肤病图片分类客户端编排
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Diagnosis Context: 候选分类、上传图片、疾病详情解码、预测结果
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PredictionClient, DetailsClient, StateStorage）
//! - Commands: 预测周期命令与导航目标
//! - Store: 编排状态（loading / error / result）与持久化
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 分析客户端 + Fake 客户端
//! - Persistence: Sled 状态存储
//! - Memory: 内存状态存储
//! - Events: Store 事件发布
//!
//! 展示层 (presentation/):
//! - 结果页视图与报告渲染

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::application::{PredictionStore, RunPredictionCycle};
pub use crate::config::{load_config_from_path, AppConfig};
