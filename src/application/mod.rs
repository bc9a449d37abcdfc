//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（预测客户端、详情客户端、状态存储）
//! - commands: 预测周期命令与导航目标
//! - store: 编排状态存储，驱动 预测 -> 详情 -> 解码 -> 组合 -> 持久化
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod store;

// Re-exports
pub use commands::{CycleOutcome, Route, RunPredictionCycle};

pub use error::{CycleError, CycleStage};

pub use ports::{
    // Analytics clients
    ClientError,
    DetailsClientPort,
    PredictionClientPort,
    // State storage
    PersistedState,
    StateStoragePort,
    StorageError,
};

pub use store::{ConcurrencyPolicy, CyclePhase, OrchestrationState, PredictionStore, StoreConfig};
