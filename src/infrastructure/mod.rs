//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod events;
pub mod memory;
pub mod persistence;

pub use adapters::{FakeAnalyticsClient, HttpAnalyticsClient, HttpAnalyticsClientConfig};
pub use events::{StoreEvent, StoreEventPublisher};
pub use memory::InMemoryStateStorage;
pub use persistence::sled::{SledStateConfig, SledStateStorage};
