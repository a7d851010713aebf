use super::entities::{ClassRoutineCount, DaySchedule};
use crate::models::{
    classes::entities::Class, subjects::entities::Subject, teachers::entities::Teacher,
};
use serde::Serialize;
use ts_rs::TS;

// 课程表总览
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct ScheduleOverviewResponse {
    pub items: Vec<ClassRoutineCount>,
}

// 管理员查看班级课程表，附带表单选项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct ClassScheduleResponse {
    pub class: Class,
    pub days: Vec<DaySchedule>,
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
}

// 教师或家长查看的周课表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct WeeklyScheduleResponse {
    pub class: Option<Class>,
    pub days: Vec<DaySchedule>,
}
