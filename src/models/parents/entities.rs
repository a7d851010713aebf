use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 家长档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct Parent {
    pub id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub phone: Option<String>,
}

// 家长名下的孩子概要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct ChildSummary {
    pub id: i64,
    pub full_name: String,
    pub admission_no: String,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
}

// 家长详情（含账号邮箱与孩子列表）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "parent.ts")]
pub struct ParentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub parent: Parent,
    pub email: Option<String>,
    pub children: Vec<ChildSummary>,
}
