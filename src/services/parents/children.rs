use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ParentService;
use crate::errors::Result;
use crate::models::attendance::entities::AttendanceSummary;
use crate::models::parents::responses::ChildDetailResponse;
use crate::models::students::entities::StudentDetail;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::current_parent;
use crate::storage::Storage;

/// 孩子详情中展示的最近考勤与成绩条数
const RECENT_LIMIT: u64 = 5;

pub async fn get_child_detail(
    service: &ParentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let parent = match current_parent(&storage, request).await {
        Ok(parent) => parent,
        Err(resp) => return Ok(resp),
    };

    let detail = match storage.get_student_by_id(student_id).await {
        Ok(detail) => detail,
        Err(e) => {
            return Ok(portal_error_response(
                &e,
                ErrorCode::StudentNotFound,
                "Failed to load student",
            ));
        }
    };

    // 学生不存在与不属于该家长返回相同结果
    let Some(detail) = detail.filter(|d| d.student.parent_id == Some(parent.id)) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this student profile",
        )));
    };

    match collect(&storage, detail).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student details retrieved successfully",
        ))),
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::InternalServerError,
            "Failed to load student details",
        )),
    }
}

async fn collect(storage: &Arc<dyn Storage>, detail: StudentDetail) -> Result<ChildDetailResponse> {
    let recent_attendance = storage
        .list_attendance_by_student(detail.student.id, Some(RECENT_LIMIT))
        .await?;
    let recent_marks = storage
        .list_marks_by_student(detail.student.id, Some(RECENT_LIMIT))
        .await?;

    Ok(ChildDetailResponse {
        attendance: AttendanceSummary::present_only(&recent_attendance),
        latest_exam: recent_marks.first().map(|m| m.exam_name.clone()),
        class_name: detail.class_name,
        student: detail.student,
        recent_attendance,
        recent_marks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        attendance::entities::AttendanceStatus, classes::requests::ClassRequest,
        parents::requests::CreateParentRequest, students::requests::CreateStudentRequest,
    };
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_service::Service as _;
    use actix_web::{App, HttpMessage, http::StatusCode, test as actix_test, web};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    async fn child(request: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
        ParentService::new_lazy()
            .get_child_detail(&request, path.into_inner())
            .await
    }

    async fn enroll(storage: &SeaOrmStorage, class_id: i64, name: &str, admission: &str) -> i64 {
        storage
            .create_student_impl(CreateStudentRequest {
                name: name.to_string(),
                surname: None,
                email: format!("{admission}@school.test"),
                admission_no: admission.to_string(),
                roll_number: None,
                class_id: Some(class_id),
            })
            .await
            .unwrap()
            .student
            .id
    }

    #[actix_web::test]
    async fn test_child_detail_scoped_to_own_children() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let class = storage
            .create_class_impl(ClassRequest {
                name: "Grade 3".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();
        let own = enroll(&storage, class.id, "Tom", "S1").await;
        let stranger = enroll(&storage, class.id, "Zed", "S2").await;

        let parent = storage
            .create_parent_impl(CreateParentRequest {
                name: "Jane".to_string(),
                surname: None,
                email: "jane@home.test".to_string(),
                phone: "555-0100".to_string(),
                student_ids: vec![own],
            })
            .await
            .unwrap();
        let user = storage
            .get_user_by_id_impl(parent.parent.user_id.unwrap())
            .await
            .unwrap()
            .unwrap();

        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        for (date, status) in [
            (monday, AttendanceStatus::Present),
            (tuesday, AttendanceStatus::Late),
        ] {
            storage
                .mark_attendance_impl(class.id, date, HashMap::from([(own, status)]))
                .await
                .unwrap();
        }

        let storage: Arc<dyn Storage> = Arc::new(storage);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(user.clone());
                    srv.call(req)
                })
                .route("/children/{id}", web::get().to(child)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri(&format!("/children/{stranger}"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 不存在的学生同样返回 403
        let req = actix_test::TestRequest::get()
            .uri("/children/9999")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/children/{own}"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        let attendance = &body["data"]["attendance"];
        // 迟到不计入出勤
        assert_eq!(attendance["total"], 2);
        assert_eq!(attendance["attended"], 1);
        assert_eq!(attendance["percentage"], 50);
        assert_eq!(body["data"]["class_name"], "Grade 3");
    }
}
