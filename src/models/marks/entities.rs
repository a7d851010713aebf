use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 新建成绩记录的默认满分
pub const DEFAULT_TOTAL_MARKS: f64 = 100.0;

// 成绩记录，(student_id, exam_id, subject_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct Mark {
    pub id: i64,
    pub student_id: i64,
    pub exam_id: i64,
    pub subject_id: i64,
    pub marks_obtained: f64,
    pub total_marks: f64,
    pub grade: Option<String>,
}

impl Mark {
    /// 展示用等级：优先使用已存等级，否则达到满分一半为 P，不足为 F
    pub fn display_grade(&self) -> String {
        if let Some(grade) = self.grade.as_deref().filter(|g| !g.trim().is_empty()) {
            return grade.to_string();
        }
        if self.marks_obtained >= self.total_marks * 0.5 {
            "P".to_string()
        } else {
            "F".to_string()
        }
    }
}

// 成绩及考试、科目名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct MarkDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub mark: Mark,
    pub exam_name: String,
    pub subject_name: String,
    pub display_grade: String,
}

// 录分表中的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "mark.ts")]
pub struct StudentMarkRow {
    pub student_id: i64,
    pub full_name: String,
    pub roll_number: Option<String>,
    pub marks_obtained: Option<f64>,
    pub total_marks: Option<f64>,
}

/// 单个学生待写入的分数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEntry {
    pub student_id: i64,
    pub marks_obtained: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(obtained: f64, grade: Option<&str>) -> Mark {
        Mark {
            id: 1,
            student_id: 1,
            exam_id: 1,
            subject_id: 1,
            marks_obtained: obtained,
            total_marks: DEFAULT_TOTAL_MARKS,
            grade: grade.map(str::to_string),
        }
    }

    #[test]
    fn test_display_grade_prefers_stored_grade() {
        assert_eq!(mark(10.0, Some("A+")).display_grade(), "A+");
    }

    #[test]
    fn test_display_grade_pass_fail() {
        assert_eq!(mark(50.0, None).display_grade(), "P");
        assert_eq!(mark(49.5, None).display_grade(), "F");
        assert_eq!(mark(30.0, Some(" ")).display_grade(), "F");
    }
}
