//! Results View - 报告渲染

use std::fmt::Write;

use crate::application::commands::Route;
use crate::application::store::OrchestrationState;
use crate::domain::diagnosis::PredictionResult;

pub const MEDICAL_DISCLAIMER: &str = "This AI-generated report is for informational purposes only \
and is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the \
advice of a qualified dermatologist or healthcare professional regarding any medical condition.";

/// 结果页视图
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    /// 没有结果，回到上传入口
    Redirect(Route),
    Report(&'a PredictionResult),
}

/// 结果页前置条件：存在预测结果
pub fn results_view(state: &OrchestrationState) -> ResultsView<'_> {
    match &state.prediction_result {
        Some(result) => ResultsView::Report(result),
        None => ResultsView::Redirect(Route::Upload),
    }
}

/// 渲染纯文本报告
pub fn render_report(result: &PredictionResult) -> String {
    let mut out = String::new();
    let top = result.top_candidate();
    let details = result.details();

    // write! 到 String 不会失败
    let _ = writeln!(out, "Uploaded Image: {}", result.image());
    let _ = writeln!(
        out,
        "Generated: {}",
        result.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "AI Prediction Results");
    for (rank, candidate) in result.predictions().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} - {:.1}% ({})",
            rank + 1,
            candidate.name,
            candidate.confidence,
            candidate.level().as_str()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Disease Report: {}", top.name);
    if let Some(overview) = &details.overview {
        let _ = writeln!(out, "{}", overview);
    }
    if details.is_empty() {
        let _ = writeln!(out, "No additional details available.");
    }

    for section in details.sections() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section.title);
        for item in section.items {
            let _ = writeln!(out, "  - {}", item);
        }
    }

    if let Some(advice) = &details.when_to_see_doctor {
        let _ = writeln!(out);
        let _ = writeln!(out, "When to See a Doctor");
        let _ = writeln!(out, "  {}", advice);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Medical Disclaimer");
    let _ = writeln!(out, "{}", MEDICAL_DISCLAIMER);
    out
}
