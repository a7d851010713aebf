use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::models::{
    attendance::entities::{AttendanceSummary, DailyAttendanceTotals},
    parents::entities::{ChildSummary, Parent},
    schedule::entities::{DayOfWeek, RoutineDetail},
    students::entities::Student,
    teachers::entities::Teacher,
};

// 管理员首页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct AdminDashboardResponse {
    pub student_count: i64,
    pub teacher_count: i64,
    pub class_count: i64,
    pub date: NaiveDate,
    pub attendance_today: DailyAttendanceTotals,
}

// 教师首页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct TeacherDashboardResponse {
    pub teacher: Teacher,
    pub class_count: i64,
    pub day: DayOfWeek,
    pub today_routines: Vec<RoutineDetail>,
}

// 学生首页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct StudentDashboardResponse {
    pub student: Student,
    pub class_name: Option<String>,
    pub attendance: AttendanceSummary,
}

// 家长首页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ParentDashboardResponse {
    pub parent: Parent,
    pub children: Vec<ChildSummary>,
}
