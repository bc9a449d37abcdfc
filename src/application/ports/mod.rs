//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod analytics_client;
mod state_storage;

pub use analytics_client::{ClientError, DetailsClientPort, PredictionClientPort};
pub use state_storage::{
    decode_persisted, encode_persisted, PersistedState, StateStoragePort, StorageError,
    PERSISTED_STATE_VERSION,
};
