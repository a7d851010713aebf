use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

// 录入成绩请求，marks 以学生 ID 为键，空值跳过
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct UpdateMarksRequest {
    pub exam_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    #[serde(default)]
    pub marks: HashMap<i64, String>,
}
