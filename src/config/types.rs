//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::store::ConcurrencyPolicy;
use crate::domain::diagnosis::DEFAULT_MAX_UPLOAD_BYTES;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 远端分析服务配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 状态持久化配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 上传配置
    #[serde(default)]
    pub upload: UploadConfig,

    /// 预测周期配置
    #[serde(default)]
    pub cycle: CycleConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 远端分析服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 服务基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 预测接口路径
    #[serde(default = "default_prediction_path")]
    pub prediction_path: String,

    /// 详情接口路径
    #[serde(default = "default_details_path")]
    pub details_path: String,

    /// multipart 图片字段名
    #[serde(default = "default_image_field")]
    pub image_field: String,

    /// 请求超时时间（秒）
    /// 不设置时客户端不施加超时
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_prediction_path() -> String {
    "/analytics/prediction/".to_string()
}

fn default_details_path() -> String {
    "/analytics/details/".to_string()
}

fn default_image_field() -> String {
    "image".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prediction_path: default_prediction_path(),
            details_path: default_details_path(),
            image_field: default_image_field(),
            timeout_secs: None,
        }
    }
}

/// 状态持久化配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Sled 数据库路径
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// 持久化条目的命名空间 key
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/dermai.sled")
}

fn default_storage_key() -> String {
    "dermai-prediction-storage".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

/// 上传配置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 上传图片最大大小（字节），默认 10MB
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
        }
    }
}

/// 预测周期配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleConfig {
    /// 周期重叠策略
    /// 可选: reject, last_writer_wins
    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
