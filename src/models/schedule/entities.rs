use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::classes::entities::Class;

// 星期，以英文全称存储与序列化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const WEEKDAYS: [DayOfWeek; 5] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// 今天是星期几（本地时区）
    pub fn today() -> Self {
        use chrono::Datelike;
        chrono::Local::now().weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DayOfWeek {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DayOfWeek::ALL
            .iter()
            .find(|day| day.as_str().to_ascii_lowercase() == lower)
            .copied()
            .ok_or_else(|| format!("Invalid day of week: {s}"))
    }
}

// 课程表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct Routine {
    pub id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// 课程表条目及关联名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct RoutineDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub routine: Routine,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_name: Option<String>,
}

// 某一天的课程
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct DaySchedule {
    pub day: DayOfWeek,
    pub routines: Vec<RoutineDetail>,
}

// 班级及其课程数量
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "schedule.ts")]
pub struct ClassRoutineCount {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub routine_count: i64,
}

/// 校验通过后写入存储层的课程表条目
#[derive(Debug, Clone)]
pub struct NewRoutine {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parse() {
        assert_eq!("monday".parse::<DayOfWeek>(), Ok(DayOfWeek::Monday));
        assert_eq!(" Sunday ".parse::<DayOfWeek>(), Ok(DayOfWeek::Sunday));
        assert!("Funday".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_day_serializes_as_english_name() {
        assert_eq!(
            serde_json::to_string(&DayOfWeek::Wednesday).unwrap(),
            "\"Wednesday\""
        );
        assert_eq!(DayOfWeek::from(Weekday::Fri), DayOfWeek::Friday);
    }
}
