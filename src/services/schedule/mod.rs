pub mod class;
pub mod create;
pub mod delete;
pub mod mine;
pub mod overview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schedule::entities::{DayOfWeek, DaySchedule, RoutineDetail};
use crate::models::schedule::requests::CreateRoutineRequest;
use crate::storage::Storage;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 各班课程数量
    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::schedule_overview(self, request).await
    }

    // 班级周课表（管理员与家长）
    pub async fn class_schedule(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        class::class_schedule(self, request, class_id).await
    }

    pub async fn create_routine(
        &self,
        request: &HttpRequest,
        routine_data: CreateRoutineRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_routine(self, request, routine_data).await
    }

    pub async fn delete_routine(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_routine(self, request, id).await
    }

    // 教师本人周课表
    pub async fn my_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mine::my_schedule(self, request).await
    }
}

/// 按星期分组课程
///
/// 每个 `days` 中的星期对应一组，组内按开始时间排序（相同时保持输入顺序）；
/// `keep_empty` 为 false 时省略没有课程的星期。
pub fn group_by_day(
    routines: Vec<RoutineDetail>,
    days: &[DayOfWeek],
    keep_empty: bool,
) -> Vec<DaySchedule> {
    let mut groups: Vec<DaySchedule> = days
        .iter()
        .map(|day| DaySchedule {
            day: *day,
            routines: Vec::new(),
        })
        .collect();

    for routine in routines {
        if let Some(group) = groups
            .iter_mut()
            .find(|g| g.day == routine.routine.day_of_week)
        {
            group.routines.push(routine);
        }
    }

    for group in &mut groups {
        group.routines.sort_by_key(|r| r.routine.start_time);
    }

    if !keep_empty {
        groups.retain(|g| !g.routines.is_empty());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::entities::Routine;
    use chrono::NaiveTime;

    fn routine(id: i64, day: DayOfWeek, hour: u32) -> RoutineDetail {
        RoutineDetail {
            routine: Routine {
                id,
                class_id: 1,
                subject_id: 1,
                teacher_id: None,
                day_of_week: day,
                start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            },
            class_name: "Grade 1".to_string(),
            subject_name: "Math".to_string(),
            teacher_name: None,
        }
    }

    #[test]
    fn test_weekdays_keep_empty_days() {
        let groups = group_by_day(
            vec![
                routine(1, DayOfWeek::Monday, 10),
                routine(2, DayOfWeek::Monday, 8),
                routine(3, DayOfWeek::Saturday, 9),
            ],
            &DayOfWeek::WEEKDAYS,
            true,
        );

        assert_eq!(groups.len(), 5);
        assert_eq!(groups[0].day, DayOfWeek::Monday);
        let ids: Vec<i64> = groups[0].routines.iter().map(|r| r.routine.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(groups[1..].iter().all(|g| g.routines.is_empty()));
    }

    #[test]
    fn test_full_week_drops_empty_days() {
        let groups = group_by_day(
            vec![
                routine(1, DayOfWeek::Sunday, 9),
                routine(2, DayOfWeek::Wednesday, 9),
            ],
            &DayOfWeek::ALL,
            false,
        );

        let days: Vec<DayOfWeek> = groups.iter().map(|g| g.day).collect();
        assert_eq!(days, vec![DayOfWeek::Wednesday, DayOfWeek::Sunday]);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_day(Vec::new(), &DayOfWeek::ALL, false).is_empty());
        assert_eq!(group_by_day(Vec::new(), &DayOfWeek::WEEKDAYS, true).len(), 5);
    }
}
