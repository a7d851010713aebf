use serde::Deserialize;
use ts_rs::TS;

use super::entities::DEFAULT_CLASS_CAPACITY;

// 创建/更新班级请求
//
// capacity 接受数字或数字字符串，缺省或无法解析时为 30
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct ClassRequest {
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub capacity: Option<serde_json::Value>,
    #[serde(default)]
    pub supervisor_id: Option<i64>,
}

pub type CreateClassRequest = ClassRequest;
pub type UpdateClassRequest = ClassRequest;

impl ClassRequest {
    pub fn capacity_or_default(&self) -> i32 {
        let parsed = match &self.capacity {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(DEFAULT_CLASS_CAPACITY)
    }

    pub fn section_or_none(&self) -> Option<String> {
        self.section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

// 单个学生的座号，空字符串表示清除
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct RollNumberEntry {
    pub student_id: i64,
    pub roll_number: String,
}

// 批量更新座号
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "class.ts")]
pub struct UpdateRollNumbersRequest {
    pub roll_numbers: Vec<RollNumberEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(capacity: Option<serde_json::Value>) -> ClassRequest {
        ClassRequest {
            name: "Grade 5".to_string(),
            section: Some("  ".to_string()),
            capacity,
            supervisor_id: None,
        }
    }

    #[test]
    fn test_capacity_defaults() {
        assert_eq!(request(None).capacity_or_default(), 30);
        assert_eq!(request(Some(serde_json::json!("abc"))).capacity_or_default(), 30);
        assert_eq!(request(Some(serde_json::json!("42"))).capacity_or_default(), 42);
        assert_eq!(request(Some(serde_json::json!(25))).capacity_or_default(), 25);
    }

    #[test]
    fn test_blank_section_is_none() {
        assert_eq!(request(None).section_or_none(), None);
    }
}
