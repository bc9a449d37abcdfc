//! 展示层 - 结果视图
//!
//! Store 之外的只读消费者：决定结果页是渲染报告还是重定向回上传入口

mod report;

pub use report::{render_report, results_view, ResultsView, MEDICAL_DISCLAIMER};
