use serde::Deserialize;
use ts_rs::TS;

// 创建科目请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    #[serde(default)]
    pub class_id: Option<i64>,
}
