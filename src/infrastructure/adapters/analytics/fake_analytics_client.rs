//! Fake Analytics Client - 用于测试和离线运行的分析客户端
//!
//! 按上传文件名 / 疾病名称返回预设响应，不实际调用远端服务

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::application::ports::{ClientError, DetailsClientPort, PredictionClientPort};
use crate::domain::diagnosis::{ImageUpload, PredictionCandidate};

/// 预设的预测响应
#[derive(Debug, Clone)]
pub enum FakePrediction {
    Candidates(Vec<PredictionCandidate>),
    Failure { status: u16 },
}

/// 预设的详情响应
#[derive(Debug, Clone)]
pub enum FakeDetails {
    Body(Value),
    Failure { status: u16 },
}

/// Fake Analytics Client
///
/// 同时实现预测和详情两个端口；可为某个文件设置闸门，
/// 预测调用会在闸门放行前挂起
#[derive(Default)]
pub struct FakeAnalyticsClient {
    predictions: HashMap<String, FakePrediction>,
    prediction_gates: HashMap<String, Arc<Notify>>,
    details: HashMap<String, FakeDetails>,
    prediction_calls: AtomicUsize,
    details_calls: AtomicUsize,
    details_requests: Mutex<Vec<String>>,
}

impl FakeAnalyticsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn with_prediction(mut self, file_name: impl Into<String>, response: FakePrediction) -> Self {
        self.predictions.insert(file_name.into(), response);
        self
    }

    /// 预测调用在 `gate.notify_one()` 之后才返回
    pub fn with_prediction_gate(mut self, file_name: impl Into<String>, gate: Arc<Notify>) -> Self {
        self.prediction_gates.insert(file_name.into(), gate);
        self
    }

    pub fn with_details(mut self, name: impl Into<String>, response: FakeDetails) -> Self {
        self.details.insert(name.into(), response);
        self
    }

    pub fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    /// 详情请求的名称，按调用顺序
    ///
    /// 锁被毒化时仍返回已记录的内容
    pub fn details_requests(&self) -> Vec<String> {
        self.details_requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record_details_request(&self, name: &str) -> Result<(), ClientError> {
        self.details_requests
            .lock()
            .map_err(|_| ClientError::InvalidRequest("details request log poisoned".to_string()))?
            .push(name.to_string());
        Ok(())
    }
}

fn failure(status: u16, what: &str) -> ClientError {
    ClientError::Status {
        status,
        body: format!("{{\"error\":\"fake {} failure\"}}", what),
    }
}

#[async_trait]
impl PredictionClientPort for FakeAnalyticsClient {
    async fn predict(&self, upload: ImageUpload) -> Result<Vec<PredictionCandidate>, ClientError> {
        self.prediction_calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            file_name = %upload.file_name(),
            size = upload.len(),
            "FakeAnalyticsClient: returning scripted prediction"
        );

        if let Some(gate) = self.prediction_gates.get(upload.file_name()) {
            gate.notified().await;
        }

        match self.predictions.get(upload.file_name()) {
            Some(FakePrediction::Candidates(candidates)) => Ok(candidates.clone()),
            Some(FakePrediction::Failure { status }) => Err(failure(*status, "prediction")),
            None => Err(ClientError::Status {
                status: 404,
                body: format!("no scripted prediction for {}", upload.file_name()),
            }),
        }
    }
}

#[async_trait]
impl DetailsClientPort for FakeAnalyticsClient {
    async fn fetch_details(&self, name: &str) -> Result<Value, ClientError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.record_details_request(name)?;

        match self.details.get(name) {
            Some(FakeDetails::Body(body)) => Ok(body.clone()),
            Some(FakeDetails::Failure { status }) => Err(failure(*status, "details")),
            None => Err(ClientError::Status {
                status: 404,
                body: format!("no scripted details for {}", name),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnosis::DEFAULT_MAX_UPLOAD_BYTES;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_responses() {
        let client = FakeAnalyticsClient::new()
            .with_prediction(
                "skin.png",
                FakePrediction::Candidates(vec![PredictionCandidate::new("Melanoma", 64.0)]),
            )
            .with_details("Melanoma", FakeDetails::Body(json!({"causes": ["UV exposure"]})));

        let upload = ImageUpload::new("skin.png", vec![1], DEFAULT_MAX_UPLOAD_BYTES).unwrap();
        let candidates = client.predict(upload).await.unwrap();
        assert_eq!(candidates[0].name, "Melanoma");

        let details = client.fetch_details("Melanoma").await.unwrap();
        assert_eq!(details["causes"][0], "UV exposure");

        let missing = client.fetch_details("Unknown").await.unwrap_err();
        assert_eq!(missing.status(), Some(404));

        assert_eq!(client.prediction_calls(), 1);
        assert_eq!(client.details_calls(), 2);
        assert_eq!(client.details_requests(), vec!["Melanoma", "Unknown"]);
    }

    #[tokio::test]
    async fn test_poisoned_request_log_fails_loudly() {
        let client = FakeAnalyticsClient::new()
            .with_details("Eczema", FakeDetails::Body(json!({})))
            .arc();
        client.fetch_details("Eczema").await.unwrap();

        let holder = client.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.details_requests.lock().unwrap();
            panic!("poison the request log");
        })
        .join();

        let err = client.fetch_details("Eczema").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert_eq!(client.details_requests(), vec!["Eczema"]);
    }
}
