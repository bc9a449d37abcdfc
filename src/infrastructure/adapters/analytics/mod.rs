//! Analytics Adapter - 预测 / 详情服务客户端实现

mod fake_analytics_client;
mod http_analytics_client;

pub use fake_analytics_client::{FakeAnalyticsClient, FakeDetails, FakePrediction};
pub use http_analytics_client::*;
