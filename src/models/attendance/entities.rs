use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 出勤率达到该百分比视为良好
pub const GOOD_STANDING_PERCENTAGE: i64 = 75;

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub const PRESENT: &'static str = "present";
    pub const ABSENT: &'static str = "absent";
    pub const LATE: &'static str = "late";

    /// 出席与迟到均计为到课
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AttendanceStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid attendance status: '{s}'. Supported: present, absent, late"
            ))
        })
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttendanceStatus::Present => AttendanceStatus::PRESENT,
            AttendanceStatus::Absent => AttendanceStatus::ABSENT,
            AttendanceStatus::Late => AttendanceStatus::LATE,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            AttendanceStatus::PRESENT => Ok(AttendanceStatus::Present),
            AttendanceStatus::ABSENT => Ok(AttendanceStatus::Absent),
            AttendanceStatus::LATE => Ok(AttendanceStatus::Late),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

// 出勤统计
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummary {
    pub total: i64,
    pub attended: i64,
    // 四舍五入后的百分比，无记录时为 0
    pub percentage: i64,
    pub good_standing: bool,
}

impl AttendanceSummary {
    pub fn new(total: i64, attended: i64) -> Self {
        let percentage = if total > 0 {
            (attended as f64 * 100.0 / total as f64).round() as i64
        } else {
            0
        };
        Self {
            total,
            attended,
            percentage,
            good_standing: percentage >= GOOD_STANDING_PERCENTAGE,
        }
    }

    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let attended = records.iter().filter(|r| r.status.is_attended()).count();
        Self::new(records.len() as i64, attended as i64)
    }

    /// 只把 present 计为出勤，家长查看孩子近期考勤时使用
    pub fn present_only(records: &[AttendanceRecord]) -> Self {
        let present = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count();
        Self::new(records.len() as i64, present as i64)
    }
}

// 某日全校考勤汇总
#[derive(Debug, Clone, Copy, Default, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct DailyAttendanceTotals {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
}

// 点名表中的一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSheetRow {
    pub student_id: i64,
    pub full_name: String,
    pub roll_number: Option<String>,
    // 已记录的状态，未记录时为 present
    pub status: AttendanceStatus,
    pub recorded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            student_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            status,
            remarks: None,
        }
    }

    #[test]
    fn test_summary_without_records() {
        let summary = AttendanceSummary::new(0, 0);
        assert_eq!(summary.percentage, 0);
        assert!(!summary.good_standing);
    }

    #[test]
    fn test_late_counts_as_attended() {
        let records = vec![
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Late),
            record(AttendanceStatus::Absent),
        ];
        let summary = AttendanceSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.attended, 2);
        assert_eq!(summary.percentage, 67);
        assert!(!summary.good_standing);
    }

    #[test]
    fn test_present_only_ignores_late() {
        let records = vec![
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Late),
        ];
        let summary = AttendanceSummary::present_only(&records);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.attended, 1);
        assert_eq!(summary.percentage, 50);
    }

    #[test]
    fn test_good_standing_threshold() {
        assert!(AttendanceSummary::new(4, 3).good_standing);
        assert!(!AttendanceSummary::new(100, 74).good_standing);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("LATE".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        let status: AttendanceStatus = serde_json::from_str("\"Absent\"").unwrap();
        assert_eq!(status, AttendanceStatus::Absent);
        assert!("excused".parse::<AttendanceStatus>().is_err());
    }
}
