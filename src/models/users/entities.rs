use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 管理员预先创建、尚未与身份提供方账号关联的用户，其 external_id 以此为前缀
pub const PENDING_EXTERNAL_ID_PREFIX: &str = "pending_";

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生
    Parent,  // 家长
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 教学相关操作（考勤、成绩）：教师与管理员
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    /// 教师门户专属
    pub fn teacher_portal_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn parent_roles() -> &'static [&'static UserRole] {
        &[&Self::Parent]
    }
    /// 班级课表查看：管理员与家长
    pub fn schedule_viewer_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Parent]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher, &Self::Student, &Self::Parent]
    }

    /// 登录后按角色跳转的门户路径
    pub fn portal_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::Teacher => "/teacher",
            UserRole::Student => "/student",
            UserRole::Parent => "/parent",
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: admin, teacher, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => UserRole::ADMIN,
            UserRole::Teacher => UserRole::TEACHER,
            UserRole::Student => UserRole::STUDENT,
            UserRole::Parent => UserRole::PARENT,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::PARENT => Ok(UserRole::Parent),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户实体（登录账号）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub external_id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// 是否为尚未登录过的预建账号
    pub fn is_pending(&self) -> bool {
        self.external_id.starts_with(PENDING_EXTERNAL_ID_PREFIX)
    }

    /// 对象缓存中该用户的键
    pub fn cache_key(&self) -> String {
        user_cache_key(&self.external_id)
    }
}

pub fn user_cache_key(external_id: &str) -> String {
    format!("user:{external_id}")
}

/// 生成预建账号的占位 external_id
pub fn pending_external_id() -> String {
    format!("{PENDING_EXTERNAL_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("teacher".parse::<UserRole>(), Ok(UserRole::Teacher));
        assert_eq!("PARENT".parse::<UserRole>(), Ok(UserRole::Parent));
        assert!("user".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Student.to_string(), "student");
    }

    #[test]
    fn test_role_deserialize() {
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("\"janitor\"").is_err());
    }

    #[test]
    fn test_portal_paths() {
        assert_eq!(UserRole::Admin.portal_path(), "/admin");
        assert_eq!(UserRole::Parent.portal_path(), "/parent");
    }

    #[test]
    fn test_pending_external_id() {
        let id = pending_external_id();
        assert!(id.starts_with(PENDING_EXTERNAL_ID_PREFIX));
        assert_ne!(id, pending_external_id());
    }
}
