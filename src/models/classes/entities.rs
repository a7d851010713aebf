use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{students::entities::Student, subjects::entities::Subject, teachers::entities::Teacher};

pub const DEFAULT_CLASS_CAPACITY: i32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 分部/分班
    pub section: Option<String>,
    // 容量
    pub capacity: i32,
    // 班主任（教师档案 ID）
    pub supervisor_id: Option<i64>,
}

// 班级列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub supervisor_name: Option<String>,
    pub student_count: i64,
}

// 班级详情，学生按座号、姓名排序
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub supervisor: Option<Teacher>,
    pub students: Vec<Student>,
}

// 教师任课的班级
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct TeacherClass {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
    pub subjects: Vec<Subject>,
}
