use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目，隶属于某个班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub class_id: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "subject.ts")]
pub struct SubjectWithClass {
    #[serde(flatten)]
    #[ts(flatten)]
    pub subject: Subject,
    pub class_name: Option<String>,
}
