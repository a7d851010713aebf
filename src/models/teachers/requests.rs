use crate::models::common::PaginationQuery;
use crate::utils::validate::compose_full_name;
use serde::Deserialize;
use ts_rs::TS;

// 教师查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 教师列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<TeacherQueryParams> for TeacherListQuery {
    fn from(params: TeacherQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

// 创建教师请求
//
// 若该邮箱已有账号，则将其提升为教师；否则创建待关联账号
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct CreateTeacherRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl CreateTeacherRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}

// 更新教师请求（整体替换姓名、邮箱与专业方向）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl UpdateTeacherRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}
