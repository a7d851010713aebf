use super::entities::StudentDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 学生列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<StudentDetail>,
}
