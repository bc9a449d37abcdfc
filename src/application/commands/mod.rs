//! 应用层 - 命令（写操作）
//!
//! 预测周期是唯一的写操作

mod prediction_commands;

pub use prediction_commands::*;
