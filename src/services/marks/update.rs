use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::MarkService;
use crate::models::marks::entities::MarkEntry;
use crate::models::marks::requests::UpdateMarksRequest;
use crate::models::{ApiResponse, ErrorCode, portal_error_response};
use crate::services::check_class_teaching_permission;

pub async fn update_marks(
    service: &MarkService,
    request: &HttpRequest,
    marks_data: UpdateMarksRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let entries = match parse_entries(&marks_data.marks) {
        Ok(entries) => entries,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::MarksInvalid, msg)));
        }
    };

    if let Err(resp) =
        check_class_teaching_permission(&storage, request, marks_data.class_id).await
    {
        return Ok(resp);
    }

    match storage
        .upsert_marks(
            marks_data.exam_id,
            marks_data.subject_id,
            marks_data.class_id,
            entries,
        )
        .await
    {
        Ok(result) => {
            info!(
                "Marks updated for exam {} class {}: {} skipped",
                marks_data.exam_id, marks_data.class_id, result.skipped
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                result,
                "Marks updated successfully",
            )))
        }
        Err(e) => Ok(portal_error_response(
            &e,
            ErrorCode::MarksInvalid,
            "Failed to update marks",
        )),
    }
}

/// 解析提交的分数，空值跳过
fn parse_entries(marks: &HashMap<i64, String>) -> Result<Vec<MarkEntry>, String> {
    let mut entries = Vec::with_capacity(marks.len());
    for (student_id, raw) in marks {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let marks_obtained = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Invalid marks '{raw}' for student {student_id}"))?;
        entries.push(MarkEntry {
            student_id: *student_id,
            marks_obtained,
        });
    }
    entries.sort_by_key(|e| e.student_id);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_skipped() {
        let marks = HashMap::from([
            (3, "88".to_string()),
            (1, " ".to_string()),
            (2, "72.5".to_string()),
        ]);
        let entries = parse_entries(&marks).unwrap();
        assert_eq!(
            entries,
            vec![
                MarkEntry {
                    student_id: 2,
                    marks_obtained: 72.5
                },
                MarkEntry {
                    student_id: 3,
                    marks_obtained: 88.0
                },
            ]
        );
    }

    #[test]
    fn test_non_numeric_rejected() {
        let marks = HashMap::from([(1, "eighty".to_string())]);
        assert!(parse_entries(&marks).is_err());
        let marks = HashMap::from([(1, "NaN".to_string())]);
        assert!(parse_entries(&marks).is_err());
    }
}
