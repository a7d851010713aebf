use serde::Deserialize;
use ts_rs::TS;

// 创建课程表条目请求，时间格式为 HH:MM
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct CreateRoutineRequest {
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}
