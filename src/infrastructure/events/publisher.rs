//! Event Publisher Implementation
//!
//! Store 状态变更事件推送，展示层据此刷新界面

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// 事件通道容量
const CHANNEL_CAPACITY: usize = 100;

/// Store 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum StoreEvent {
    /// 持久化状态已加载
    StateRehydrated { has_result: bool },
    /// 周期开始（进入 loading）
    CycleStarted { cycle_id: Uuid, image: String },
    /// 周期成功，结果已提交
    CycleSucceeded {
        cycle_id: Uuid,
        top_candidate: String,
        confidence: f64,
    },
    /// 周期失败
    CycleFailed {
        cycle_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<String>,
        error: String,
    },
}

/// 事件发布器
pub struct StoreEventPublisher {
    channel: broadcast::Sender<StoreEvent>,
}

impl StoreEventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅 store 事件
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.channel.subscribe()
    }

    pub fn publish_rehydrated(&self, has_result: bool) {
        self.publish(StoreEvent::StateRehydrated { has_result });
    }

    pub fn publish_cycle_started(&self, cycle_id: Uuid, image: &str) {
        self.publish(StoreEvent::CycleStarted {
            cycle_id,
            image: image.to_string(),
        });
    }

    pub fn publish_cycle_succeeded(&self, cycle_id: Uuid, top_candidate: &str, confidence: f64) {
        self.publish(StoreEvent::CycleSucceeded {
            cycle_id,
            top_candidate: top_candidate.to_string(),
            confidence,
        });
    }

    pub fn publish_cycle_failed(&self, cycle_id: Uuid, stage: Option<&str>, error: &str) {
        self.publish(StoreEvent::CycleFailed {
            cycle_id,
            stage: stage.map(str::to_string),
            error: error.to_string(),
        });
    }

    fn publish(&self, event: StoreEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish store event (no receivers)");
        }
    }
}

impl Default for StoreEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let publisher = StoreEventPublisher::new();
        let mut rx = publisher.subscribe();
        let cycle_id = Uuid::new_v4();

        publisher.publish_cycle_started(cycle_id, "blob:preview");
        publisher.publish_cycle_failed(cycle_id, Some("prediction"), "Failed to get disease prediction.");

        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::CycleStarted {
                cycle_id,
                image: "blob:preview".to_string()
            }
        );
        match rx.recv().await.unwrap() {
            StoreEvent::CycleFailed { stage, error, .. } => {
                assert_eq!(stage.as_deref(), Some("prediction"));
                assert_eq!(error, "Failed to get disease prediction.");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let publisher = StoreEventPublisher::new();
        publisher.publish_rehydrated(false);
    }

    #[test]
    fn test_event_wire_format() {
        let value = serde_json::to_value(StoreEvent::StateRehydrated { has_result: true }).unwrap();
        assert_eq!(value["event"], "StateRehydrated");
        assert_eq!(value["data"]["has_result"], true);
    }
}
