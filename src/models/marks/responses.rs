use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;

use super::entities::MarkDetail;
use crate::models::{
    classes::entities::{Class, TeacherClass},
    exams::entities::Exam,
    students::entities::Student,
    subjects::entities::Subject,
};

// 成绩写入结果
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct MarksUpdateResponse {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

// 教师成绩总览：考试与任课班级
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct TeacherMarksOverviewResponse {
    pub exams: Vec<Exam>,
    pub classes: Vec<TeacherClass>,
}

// 教师录分表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct TeacherGradingSheetResponse {
    pub exam: Exam,
    pub class: Class,
    pub subject: Subject,
    pub students: Vec<Student>,
    // 学生 ID -> 已录入分数
    pub marks: HashMap<i64, f64>,
}

// 学生本人成绩（按考试倒序）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct StudentGradesResponse {
    pub items: Vec<MarkDetail>,
}
