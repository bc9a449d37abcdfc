//! Prediction Commands - 预测周期命令

use uuid::Uuid;

use crate::domain::diagnosis::{ImageHandle, ImageUpload, PredictionResult};

/// 展示层路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// 上传入口
    Upload,
    /// 结果页（前置条件：存在预测结果）
    Results,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Upload => "/predict",
            Route::Results => "/results",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// 运行一次预测周期
#[derive(Debug, Clone)]
pub struct RunPredictionCycle {
    /// 上传给预测接口的图片
    pub upload: ImageUpload,
    /// 展示层持有的预览句柄，store 只保存引用
    pub preview: ImageHandle,
}

/// 成功周期的结果
///
/// 状态已提交并持久化后才返回；`navigate_to` 取代原先的成功回调
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub cycle_id: Uuid,
    pub result: PredictionResult,
    pub navigate_to: Route,
}
