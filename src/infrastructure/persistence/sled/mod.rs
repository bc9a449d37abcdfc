//! Sled 嵌入式存储

mod state_storage;

pub use state_storage::{SledStateConfig, SledStateStorage};
