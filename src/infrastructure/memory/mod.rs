//! Memory Layer - In-Memory State Storage
//!
//! 不落盘的状态存储，用于测试和临时会话

mod state_storage;

pub use state_storage::InMemoryStateStorage;
