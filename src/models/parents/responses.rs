use super::entities::ParentDetail;
use crate::models::{
    attendance::entities::{AttendanceRecord, AttendanceSummary},
    common::PaginationInfo,
    marks::entities::MarkDetail,
    students::entities::Student,
};
use serde::Serialize;
use ts_rs::TS;

// 家长列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct ParentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ParentDetail>,
}

// 家长查看孩子详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct ChildDetailResponse {
    pub student: Student,
    pub class_name: Option<String>,
    // 基于最近的考勤记录统计
    pub attendance: AttendanceSummary,
    pub recent_attendance: Vec<AttendanceRecord>,
    pub recent_marks: Vec<MarkDetail>,
    pub latest_exam: Option<String>,
}
