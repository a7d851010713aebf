use super::entities::{ClassSummary, TeacherClass};
use serde::Serialize;
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassSummary>,
}

// 教师任课班级列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct TeacherClassListResponse {
    pub items: Vec<TeacherClass>,
}

// 座号更新结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct RollNumberUpdateResponse {
    pub updated: u64,
}
