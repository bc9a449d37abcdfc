//! Prediction Store - 预测周期编排
//!
//! 顺序调用预测接口和详情接口，维护 loading / error / result 状态，
//! 每次状态变更后持久化，成功时返回导航结果交给展示层。

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::state::{ConcurrencyPolicy, CyclePhase, OrchestrationState, StoreConfig};
use crate::application::commands::{CycleOutcome, Route, RunPredictionCycle};
use crate::application::error::CycleError;
use crate::application::ports::{
    DetailsClientPort, PersistedState, PredictionClientPort, StateStoragePort, StorageError,
};
use crate::domain::diagnosis::{
    decode_details, DiseaseDetails, ImageHandle, ImageUpload, PredictionResult,
};
use crate::infrastructure::events::{StoreEvent, StoreEventPublisher};

/// 预测编排 Store
///
/// 显式构造并注入展示层：展示层只持有读引用（`snapshot` / `subscribe`）
/// 和派发入口（`run_prediction_cycle`）
pub struct PredictionStore {
    config: StoreConfig,
    state: RwLock<OrchestrationState>,
    prediction_client: Arc<dyn PredictionClientPort>,
    details_client: Arc<dyn DetailsClientPort>,
    storage: Arc<dyn StateStoragePort>,
    event_publisher: Arc<StoreEventPublisher>,
}

impl PredictionStore {
    /// 以默认状态创建；首次渲染前需调用 `rehydrate`
    pub fn new(
        config: StoreConfig,
        prediction_client: Arc<dyn PredictionClientPort>,
        details_client: Arc<dyn DetailsClientPort>,
        storage: Arc<dyn StateStoragePort>,
        event_publisher: Arc<StoreEventPublisher>,
    ) -> Self {
        Self {
            config,
            state: RwLock::new(OrchestrationState::default()),
            prediction_client,
            details_client,
            storage,
            event_publisher,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 加载持久化状态
    ///
    /// `is_loading` / `error` 总是重置，进行中或失败的周期不会在重载后恢复。
    /// 损坏的条目会被丢弃。返回是否恢复了预测结果。
    pub async fn rehydrate(&self) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        if state.is_loading {
            tracing::warn!("Prediction cycle in flight, skipping rehydrate");
            return Ok(false);
        }

        let persisted = match self.storage.load().await {
            Ok(persisted) => persisted.unwrap_or_default(),
            Err(StorageError::SerializationError(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted state");
                PersistedState::default()
            }
            Err(e) => return Err(e),
        };

        *state = OrchestrationState::from_persisted(persisted);
        let has_result = state.prediction_result.is_some();
        drop(state);

        tracing::info!(has_result = has_result, "Prediction state rehydrated");
        self.event_publisher.publish_rehydrated(has_result);
        Ok(has_result)
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> OrchestrationState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> CyclePhase {
        self.state.read().await.phase()
    }

    /// 订阅状态变更事件
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_publisher.subscribe()
    }

    /// 运行一次预测周期
    ///
    /// 预测 → 取首个候选 → 详情 → 解码 → 组合。两次远端调用严格顺序执行，
    /// 每次最多一次成功导航。
    pub async fn run_prediction_cycle(
        &self,
        cmd: RunPredictionCycle,
    ) -> Result<CycleOutcome, CycleError> {
        let cycle_id = Uuid::new_v4();
        let RunPredictionCycle { upload, preview } = cmd;

        self.begin_cycle(cycle_id, &preview).await?;

        match self.execute(cycle_id, upload, preview.clone()).await {
            Ok(result) => {
                self.commit_success(cycle_id, &result).await;
                Ok(CycleOutcome {
                    cycle_id,
                    result,
                    navigate_to: Route::Results,
                })
            }
            Err(err) => {
                self.commit_failure(cycle_id, &preview, &err).await;
                Err(err)
            }
        }
    }

    /// 刷新持久化存储（teardown）
    pub async fn shutdown(&self) -> Result<(), StorageError> {
        self.storage.flush().await?;
        tracing::debug!("Prediction store shut down");
        Ok(())
    }

    /// 进入 loading：清空上次结果，记录预览句柄
    async fn begin_cycle(&self, cycle_id: Uuid, preview: &ImageHandle) -> Result<(), CycleError> {
        let mut state = self.state.write().await;

        if state.is_loading {
            match self.config.concurrency {
                ConcurrencyPolicy::Reject => {
                    tracing::warn!(
                        cycle_id = %cycle_id,
                        "Rejecting prediction cycle, another one is in flight"
                    );
                    return Err(CycleError::CycleInProgress);
                }
                ConcurrencyPolicy::LastWriterWins => {
                    tracing::warn!(
                        cycle_id = %cycle_id,
                        "Starting overlapping prediction cycle, last writer wins"
                    );
                }
            }
        }

        state.is_loading = true;
        state.error = None;
        state.prediction_result = None;
        state.uploaded_image_url = Some(preview.clone());
        self.persist(&state).await;
        drop(state);

        tracing::info!(cycle_id = %cycle_id, image = %preview, "Prediction cycle started");
        self.event_publisher
            .publish_cycle_started(cycle_id, preview.as_str());
        Ok(())
    }

    async fn execute(
        &self,
        cycle_id: Uuid,
        upload: ImageUpload,
        preview: ImageHandle,
    ) -> Result<PredictionResult, CycleError> {
        let predictions = self
            .prediction_client
            .predict(upload)
            .await
            .map_err(CycleError::PredictionFailed)?;

        let top_candidate = predictions
            .first()
            .map(|c| c.name.clone())
            .ok_or(CycleError::NoCandidates)?;

        tracing::debug!(
            cycle_id = %cycle_id,
            candidates = predictions.len(),
            top_candidate = %top_candidate,
            "Prediction received"
        );

        let raw_details = self
            .details_client
            .fetch_details(&top_candidate)
            .await
            .map_err(CycleError::DetailsFailed)?;

        let details = decode_details(raw_details).unwrap_or_else(|e| {
            tracing::warn!(
                cycle_id = %cycle_id,
                top_candidate = %top_candidate,
                error = %e,
                "Details payload could not be decoded, using empty details"
            );
            DiseaseDetails::default()
        });

        PredictionResult::new(preview, predictions, details).ok_or(CycleError::NoCandidates)
    }

    async fn commit_success(&self, cycle_id: Uuid, result: &PredictionResult) {
        let mut state = self.state.write().await;
        state.is_loading = false;
        state.error = None;
        state.uploaded_image_url = Some(result.image().clone());
        state.prediction_result = Some(result.clone());
        self.persist(&state).await;
        drop(state);

        let top = result.top_candidate();
        tracing::info!(
            cycle_id = %cycle_id,
            top_candidate = %top.name,
            confidence = top.confidence,
            "Prediction cycle succeeded"
        );
        self.event_publisher
            .publish_cycle_succeeded(cycle_id, &top.name, top.confidence);
    }

    /// 失败提交同样以本周期为准：重叠周期留下的结果会被清掉
    async fn commit_failure(&self, cycle_id: Uuid, preview: &ImageHandle, err: &CycleError) {
        let message = err.to_string();

        let mut state = self.state.write().await;
        state.is_loading = false;
        state.error = Some(message.clone());
        state.prediction_result = None;
        state.uploaded_image_url = Some(preview.clone());
        self.persist(&state).await;
        drop(state);

        let stage = err.stage().map(|s| s.as_str());
        match err {
            CycleError::PredictionFailed(source) | CycleError::DetailsFailed(source) => {
                tracing::error!(
                    cycle_id = %cycle_id,
                    stage = ?stage,
                    status = ?source.status(),
                    error = %source,
                    "Prediction cycle failed"
                );
            }
            _ => {
                tracing::error!(cycle_id = %cycle_id, stage = ?stage, error = %message, "Prediction cycle failed");
            }
        }
        self.event_publisher
            .publish_cycle_failed(cycle_id, stage, &message);
    }

    /// save-after-mutate；持久化失败只记录，不影响周期
    async fn persist(&self, state: &OrchestrationState) {
        if let Err(e) = self.storage.save(&state.persisted()).await {
            tracing::warn!(error = %e, "Failed to persist prediction state");
        }
    }
}
