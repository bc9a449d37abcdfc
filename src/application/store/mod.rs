//! Orchestration Store - 预测编排状态机
//!
//! Idle → Loading → {Success, Failed}，成功与失败都可以重新进入 Loading。
//! Store 是 `OrchestrationState` 的唯一写入者。

mod prediction_store;
mod state;

pub use prediction_store::PredictionStore;
pub use state::{ConcurrencyPolicy, CyclePhase, OrchestrationState, StoreConfig};
