use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use crate::models::schedule::entities::{DayOfWeek, NewRoutine};
use crate::models::schedule::requests::CreateRoutineRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::utils::parse_hhmm;

pub async fn create_routine(
    service: &ScheduleService,
    request: &HttpRequest,
    routine_data: CreateRoutineRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let routine = match validate_routine(routine_data) {
        Ok(routine) => routine,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::RoutineInvalid, msg)));
        }
    };

    match storage.create_routine(routine).await {
        Ok(routine) => {
            info!(
                "Routine {} created for class {} on {}",
                routine.id, routine.class_id, routine.day_of_week
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(routine, "Routine added successfully")))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::RoutineInvalid,
            "Failed to create routine",
        )),
    }
}

/// 校验必填字段与时间段
fn validate_routine(data: CreateRoutineRequest) -> Result<NewRoutine, String> {
    let (Some(class_id), Some(subject_id), Some(day), Some(start), Some(end)) = (
        data.class_id,
        data.subject_id,
        data.day.as_deref(),
        data.start_time.as_deref(),
        data.end_time.as_deref(),
    ) else {
        return Err("Class, subject, day and time are required".to_string());
    };

    let day_of_week = day.parse::<DayOfWeek>()?;
    let start_time = parse_hhmm(start)?;
    let end_time = parse_hhmm(end)?;
    if end_time <= start_time {
        return Err("End time must be after start time".to_string());
    }

    Ok(NewRoutine {
        class_id,
        subject_id,
        teacher_id: data.teacher_id,
        day_of_week,
        start_time,
        end_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CreateRoutineRequest {
        CreateRoutineRequest {
            class_id: Some(1),
            subject_id: Some(2),
            teacher_id: None,
            day: Some("tuesday".to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
        }
    }

    #[test]
    fn test_valid_routine() {
        let routine = validate_routine(request("08:00", "08:45")).unwrap();
        assert_eq!(routine.day_of_week, DayOfWeek::Tuesday);
        assert_eq!(routine.subject_id, 2);
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(validate_routine(request("09:00", "09:00")).is_err());
        assert!(validate_routine(request("10:00", "09:00")).is_err());
    }

    #[test]
    fn test_missing_fields() {
        let mut data = request("08:00", "09:00");
        data.subject_id = None;
        assert_eq!(
            validate_routine(data).unwrap_err(),
            "Class, subject, day and time are required"
        );
    }

    #[test]
    fn test_bad_day_or_time() {
        let mut data = request("08:00", "09:00");
        data.day = Some("Someday".to_string());
        assert!(validate_routine(data).is_err());
        assert!(validate_routine(request("8am", "09:00")).is_err());
    }
}
