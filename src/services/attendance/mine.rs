use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::models::attendance::responses::StudentAttendanceResponse;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_student;

pub async fn my_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = match current_student(&storage, request).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    match storage.list_attendance_by_student(student.id, None).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            history(records),
            "Attendance history retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to retrieve attendance history",
        )),
    }
}

fn history(records: Vec<AttendanceRecord>) -> StudentAttendanceResponse {
    let count =
        |status: AttendanceStatus| records.iter().filter(|r| r.status == status).count() as i64;
    let (present, late, absent) = (
        count(AttendanceStatus::Present),
        count(AttendanceStatus::Late),
        count(AttendanceStatus::Absent),
    );
    StudentAttendanceResponse {
        summary: AttendanceSummary::from_records(&records),
        records,
        present,
        late,
        absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_history_counts() {
        let records: Vec<AttendanceRecord> = [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, status)| AttendanceRecord {
            id: i as i64,
            student_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 10 - i as u32).unwrap(),
            status,
            remarks: None,
        })
        .collect();

        let response = history(records);
        assert_eq!((response.present, response.late, response.absent), (2, 1, 1));
        assert_eq!(response.summary.percentage, 75);
        assert!(response.summary.good_standing);
    }
}
