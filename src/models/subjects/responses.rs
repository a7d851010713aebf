use super::entities::SubjectWithClass;
use serde::Serialize;
use ts_rs::TS;

// 科目列表响应（按班级排序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "subject.ts")]
pub struct SubjectListResponse {
    pub items: Vec<SubjectWithClass>,
}
