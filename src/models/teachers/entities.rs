use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct Teacher {
    pub id: i64,
    // 关联的登录账号
    pub user_id: Option<i64>,
    pub full_name: String,
    pub specialization: Option<String>,
}

// 教师档案及其账号邮箱
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub teacher: Teacher,
    pub email: Option<String>,
}
