use super::entities::{Exam, ExamSummary};
use crate::models::{
    classes::entities::Class, marks::entities::StudentMarkRow, subjects::entities::SubjectWithClass,
};
use serde::Serialize;
use ts_rs::TS;

// 考试列表响应（按时间倒序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamListResponse {
    pub items: Vec<ExamSummary>,
}

// 录分表：选定班级与科目后返回学生及已有成绩
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct GradingSheetResponse {
    pub exam: Exam,
    pub classes: Vec<Class>,
    pub subjects: Vec<SubjectWithClass>,
    pub students: Option<Vec<StudentMarkRow>>,
}
