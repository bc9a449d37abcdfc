//! Diagnosis Context - Errors

use thiserror::Error;

/// 上传图片校验错误
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("不支持的图片格式: {0}（仅支持 PNG、JPG、WEBP）")]
    UnsupportedFormat(String),

    #[error("图片过大: {size} 字节（上限 {limit} 字节）")]
    TooLarge { size: u64, limit: u64 },

    #[error("图片为空: {0}")]
    Empty(String),

    #[error("读取图片失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 详情解码错误
///
/// 在编排流程中被吞掉并降级为空详情，不会中断周期
#[derive(Debug, Error)]
pub enum DetailsDecodeError {
    #[error("details payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("details payload is not a mapping (found {0})")]
    NotAMapping(&'static str),

    #[error("details payload is encoded more than {0} times")]
    TooDeeplyEncoded(usize),
}
