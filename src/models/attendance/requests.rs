use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

// 点名表查询参数，date 格式为 YYYY-MM-DD，缺省为今天
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSheetQuery {
    pub date: Option<String>,
}

// 提交考勤请求，records 以学生 ID 为键
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MarkAttendanceRequest {
    pub class_id: i64,
    pub date: String,
    #[serde(default)]
    pub records: HashMap<i64, AttendanceStatus>,
}
