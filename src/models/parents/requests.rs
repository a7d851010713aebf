use crate::models::common::PaginationQuery;
use crate::utils::validate::compose_full_name;
use serde::Deserialize;
use ts_rs::TS;

// 家长查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct ParentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 家长列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ParentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

impl From<ParentQueryParams> for ParentListQuery {
    fn from(params: ParentQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
        }
    }
}

// 创建家长请求，student_ids 中的学生会关联到该家长
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct CreateParentRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

impl CreateParentRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}

// 更新家长请求，student_ids 为关联孩子的完整集合
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct UpdateParentRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

impl UpdateParentRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}
