use serde::Deserialize;
use ts_rs::TS;

// 创建考试请求，日期格式为 YYYY-MM-DD
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamRequest {
    pub name: String,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

// 录分表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct GradingSheetQuery {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
}
