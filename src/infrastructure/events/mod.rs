//! Events - Store 事件发布

mod publisher;

pub use publisher::{StoreEvent, StoreEventPublisher};
