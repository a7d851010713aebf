use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::{AttendanceRecord, AttendanceSheetRow, AttendanceSummary};
use crate::models::classes::entities::{Class, ClassSummary};

// 考勤总览（各班学生数）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceOverviewResponse {
    pub items: Vec<ClassSummary>,
}

// 某班某日点名表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSheetResponse {
    pub class: Class,
    pub date: NaiveDate,
    pub students: Vec<AttendanceSheetRow>,
}

// 提交考勤结果
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MarkAttendanceResponse {
    pub created: u64,
    pub updated: u64,
}

// 学生本人考勤历史
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct StudentAttendanceResponse {
    pub records: Vec<AttendanceRecord>,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub summary: AttendanceSummary,
}
