use crate::models::common::PaginationQuery;
use crate::utils::validate::compose_full_name;
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    // 按姓名或学号搜索
    pub search: Option<String>,
    pub class_id: Option<i64>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub class_id: Option<i64>,
}

impl From<StudentQueryParams> for StudentListQuery {
    fn from(params: StudentQueryParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            search: params.search,
            class_id: params.class_id,
        }
    }
}

// 创建学生请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub admission_no: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub class_id: Option<i64>,
}

impl CreateStudentRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}

// 更新学生请求，class_id / parent_id 为空表示取消关联
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub name: String,
    #[serde(default)]
    pub surname: Option<String>,
    pub email: String,
    pub admission_no: String,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl UpdateStudentRequest {
    pub fn full_name(&self) -> String {
        compose_full_name(&self.name, self.surname.as_deref())
    }
}
