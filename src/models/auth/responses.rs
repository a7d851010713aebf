use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 当前登录用户信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct CurrentUserResponse {
    pub user: User,
    // 关联的教师/学生/家长档案 ID，管理员为空
    pub profile_id: Option<i64>,
    // 按角色跳转的门户路径
    pub portal: String,
}
