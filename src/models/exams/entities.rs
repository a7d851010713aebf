use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Exam {
    pub id: i64,
    pub name: String,
    // 学期
    pub term: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// 考试列表项（含已录入成绩数）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub exam: Exam,
    pub mark_count: i64,
}

/// 校验通过后写入存储层的考试
#[derive(Debug, Clone)]
pub struct NewExam {
    pub name: String,
    pub term: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
