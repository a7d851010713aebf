use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::entities::{AttendanceRecord, AttendanceSheetRow, AttendanceStatus};
use crate::models::attendance::requests::AttendanceSheetQuery;
use crate::models::attendance::responses::AttendanceSheetResponse;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::check_class_teaching_permission;
use crate::utils::parse_date;

pub async fn class_sheet(
    service: &AttendanceService,
    request: &HttpRequest,
    class_id: i64,
    query: AttendanceSheetQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => match parse_date(raw) {
            Ok(date) => date,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AttendanceInvalid, msg)));
            }
        },
        None => chrono::Local::now().date_naive(),
    };

    if let Err(resp) = check_class_teaching_permission(&storage, request, class_id).await {
        return Ok(resp);
    }

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load class",
            ));
        }
    };

    let students = match storage.list_students_by_class(class_id).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::InternalServerError,
                "Failed to load students",
            ));
        }
    };

    match storage.list_attendance_for_class(class_id, date).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceSheetResponse {
                class,
                date,
                students: build_sheet(students, &records),
            },
            "Attendance sheet retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load attendance records",
        )),
    }
}

/// 点名表行，未记录的学生默认为出席
fn build_sheet(students: Vec<Student>, records: &[AttendanceRecord]) -> Vec<AttendanceSheetRow> {
    let recorded: HashMap<i64, AttendanceStatus> =
        records.iter().map(|r| (r.student_id, r.status)).collect();

    students
        .into_iter()
        .map(|student| {
            let status = recorded.get(&student.id).copied();
            AttendanceSheetRow {
                student_id: student.id,
                full_name: student.full_name,
                roll_number: student.roll_number,
                status: status.unwrap_or(AttendanceStatus::Present),
                recorded: status.is_some(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            user_id: None,
            full_name: name.to_string(),
            admission_no: format!("S{id}"),
            roll_number: None,
            class_id: Some(1),
            parent_id: None,
        }
    }

    #[test]
    fn test_unrecorded_students_default_to_present() {
        let records = vec![AttendanceRecord {
            id: 1,
            student_id: 2,
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            status: AttendanceStatus::Absent,
            remarks: None,
        }];

        let rows = build_sheet(vec![student(1, "Ann"), student(2, "Tom")], &records);
        assert_eq!(rows[0].status, AttendanceStatus::Present);
        assert!(!rows[0].recorded);
        assert_eq!(rows[1].status, AttendanceStatus::Absent);
        assert!(rows[1].recorded);
    }
}
