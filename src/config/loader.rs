//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `DERMAI_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `DERMAI_API__BASE_URL=http://analytics:8000`
/// - `DERMAI_API__TIMEOUT_SECS=30`
/// - `DERMAI_STORAGE__PATH=/data/dermai.sled`
/// - `DERMAI_CYCLE__CONCURRENCY=last_writer_wins`
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("api.base_url", "http://localhost:8000")?
        .set_default("api.prediction_path", "/analytics/prediction/")?
        .set_default("api.details_path", "/analytics/details/")?
        .set_default("api.image_field", "image")?
        .set_default("storage.path", "data/dermai.sled")?
        .set_default("storage.key", "dermai-prediction-storage")?
        .set_default("upload.max_size_bytes", 10 * 1024 * 1024)?
        .set_default("cycle.concurrency", "reject")?
        .set_default("log.level", "info")?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: DERMAI_
    // 层级分隔符: __ (双下划线)
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("DERMAI")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证服务 URL
    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "API base URL cannot be empty".to_string(),
        ));
    }

    // 验证接口路径
    for (name, path) in [
        ("prediction_path", &config.api.prediction_path),
        ("details_path", &config.api.details_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "API {} must start with '/': {}",
                name, path
            )));
        }
    }

    if config.api.image_field.is_empty() {
        return Err(ConfigError::ValidationError(
            "Image field name cannot be empty".to_string(),
        ));
    }

    if config.api.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "API timeout cannot be 0, omit it to disable".to_string(),
        ));
    }

    // 验证存储配置
    if config.storage.key.is_empty() {
        return Err(ConfigError::ValidationError(
            "Storage key cannot be empty".to_string(),
        ));
    }

    if config.upload.max_size_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Upload size limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Analytics Base URL: {}", config.api.base_url);
    tracing::info!("Prediction Path: {}", config.api.prediction_path);
    tracing::info!("Details Path: {}", config.api.details_path);
    tracing::info!("Image Field: {}", config.api.image_field);
    match config.api.timeout_secs {
        Some(secs) => tracing::info!("API Timeout: {}s", secs),
        None => tracing::info!("API Timeout: none"),
    }
    tracing::info!("Storage: {:?} (key {})", config.storage.path, config.storage.key);
    tracing::info!("Max Upload Size: {} bytes", config.upload.max_size_bytes);
    tracing::info!("Cycle Concurrency: {:?}", config.cycle.concurrency);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
