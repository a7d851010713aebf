use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    // 学号，全局唯一
    pub admission_no: String,
    // 班内座号
    pub roll_number: Option<String>,
    pub class_id: Option<i64>,
    pub parent_id: Option<i64>,
}

// 学生详情（含账号邮箱、班级名称、家长姓名）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub email: Option<String>,
    pub class_name: Option<String>,
    pub parent_name: Option<String>,
}
