//! 成绩存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::marks::{ActiveModel, Column};
use crate::entity::prelude::*;
use crate::entity::{exams, students, subjects};
use crate::errors::{PortalError, Result};
use crate::models::marks::{
    entities::{DEFAULT_TOTAL_MARKS, Mark, MarkDetail, MarkEntry},
    responses::MarksUpdateResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 录入成绩
    ///
    /// 科目必须属于该班级，只处理该班级的学生；分数须在 0 到满分之间，
    /// 任一分数不合法时整批回滚。
    pub async fn upsert_marks_impl(
        &self,
        exam_id: i64,
        subject_id: i64,
        class_id: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<MarksUpdateResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        if Exams::find_by_id(exam_id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询考试失败"))?
            .is_none()
        {
            return Err(PortalError::not_found("Exam not found"));
        }

        let subject = Subjects::find_by_id(subject_id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询科目失败"))?
            .ok_or_else(|| PortalError::not_found("Subject not found"))?;
        if subject.class_id != class_id {
            return Err(PortalError::validation(
                "Subject does not belong to this class",
            ));
        }

        let student_ids: Vec<i64> = Students::find()
            .filter(students::Column::ClassId.eq(class_id))
            .select_only()
            .column(students::Column::Id)
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询班级学生失败"))?;

        let mut existing: HashMap<i64, MarkModel> = Marks::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::SubjectId.eq(subject_id))
            .all(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询成绩失败"))?
            .into_iter()
            .map(|m| (m.student_id, m))
            .collect();

        let mut response = MarksUpdateResponse {
            created: 0,
            updated: 0,
            skipped: 0,
        };

        for entry in entries {
            if !student_ids.contains(&entry.student_id) {
                response.skipped += 1;
                continue;
            }

            let total = existing
                .get(&entry.student_id)
                .map(|m| m.total_marks)
                .unwrap_or(DEFAULT_TOTAL_MARKS);
            if !entry.marks_obtained.is_finite()
                || entry.marks_obtained < 0.0
                || entry.marks_obtained > total
            {
                return Err(PortalError::validation(format!(
                    "Marks must be between 0 and {total}"
                )));
            }

            match existing.remove(&entry.student_id) {
                Some(model) => {
                    let mut active: ActiveModel = model.into();
                    active.marks_obtained = Set(entry.marks_obtained);
                    active
                        .update(&txn)
                        .await
                        .map_err(|e| map_write_error(e, "更新成绩失败"))?;
                    response.updated += 1;
                }
                None => {
                    ActiveModel {
                        student_id: Set(entry.student_id),
                        exam_id: Set(exam_id),
                        subject_id: Set(subject_id),
                        marks_obtained: Set(entry.marks_obtained),
                        total_marks: Set(DEFAULT_TOTAL_MARKS),
                        grade: Set(None),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| map_write_error(e, "创建成绩失败"))?;
                    response.created += 1;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Marks saved for exam {} subject {}: {} created, {} updated",
            exam_id, subject_id, response.created, response.updated
        );
        Ok(response)
    }

    pub async fn list_marks_by_exam_subject_impl(
        &self,
        exam_id: i64,
        subject_id: i64,
    ) -> Result<Vec<Mark>> {
        let marks = Marks::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::SubjectId.eq(subject_id))
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询成绩失败"))?;
        Ok(marks.into_iter().map(|m| m.into_mark()).collect())
    }

    /// 学生成绩（按考试倒序），含考试与科目名称
    pub async fn list_marks_by_student_impl(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<MarkDetail>> {
        let mut select = Marks::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::ExamId)
            .order_by_asc(Column::SubjectId);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        let marks = select
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生成绩失败"))?;
        if marks.is_empty() {
            return Ok(Vec::new());
        }

        let exam_names: HashMap<i64, String> = Exams::find()
            .filter(exams::Column::Id.is_in(marks.iter().map(|m| m.exam_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询考试失败"))?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        let subject_names: HashMap<i64, String> = Subjects::find()
            .filter(
                subjects::Column::Id.is_in(marks.iter().map(|m| m.subject_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询科目失败"))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        Ok(marks
            .into_iter()
            .map(|m| {
                let mark = m.into_mark();
                MarkDetail {
                    exam_name: exam_names.get(&mark.exam_id).cloned().unwrap_or_default(),
                    subject_name: subject_names
                        .get(&mark.subject_id)
                        .cloned()
                        .unwrap_or_default(),
                    display_grade: mark.display_grade(),
                    mark,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        classes::requests::ClassRequest, exams::entities::NewExam,
        students::requests::CreateStudentRequest, subjects::requests::CreateSubjectRequest,
    };

    struct Fixture {
        exam_id: i64,
        subject_id: i64,
        class_id: i64,
        student_id: i64,
    }

    async fn fixture(storage: &SeaOrmStorage) -> Fixture {
        let class = storage
            .create_class_impl(ClassRequest {
                name: "Grade 6".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Physics".to_string(),
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        let exam = storage
            .create_exam_impl(NewExam {
                name: "Midterm".to_string(),
                term: None,
                start_date: None,
                end_date: None,
            })
            .await
            .unwrap();
        let student = storage
            .create_student_impl(CreateStudentRequest {
                name: "Ada".to_string(),
                surname: None,
                email: "ada@school.test".to_string(),
                admission_no: "S1".to_string(),
                roll_number: None,
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        Fixture {
            exam_id: exam.id,
            subject_id: subject.id,
            class_id: class.id,
            student_id: student.student.id,
        }
    }

    #[tokio::test]
    async fn test_upsert_marks_creates_then_updates() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;

        let first = storage
            .upsert_marks_impl(
                f.exam_id,
                f.subject_id,
                f.class_id,
                vec![
                    MarkEntry {
                        student_id: f.student_id,
                        marks_obtained: 42.0,
                    },
                    MarkEntry {
                        student_id: 777,
                        marks_obtained: 90.0,
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!((first.created, first.updated, first.skipped), (1, 0, 1));

        let second = storage
            .upsert_marks_impl(
                f.exam_id,
                f.subject_id,
                f.class_id,
                vec![MarkEntry {
                    student_id: f.student_id,
                    marks_obtained: 77.5,
                }],
            )
            .await
            .unwrap();
        assert_eq!((second.created, second.updated), (0, 1));

        let marks = storage
            .list_marks_by_exam_subject_impl(f.exam_id, f.subject_id)
            .await
            .unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].marks_obtained, 77.5);
        assert_eq!(marks[0].total_marks, DEFAULT_TOTAL_MARKS);

        let grades = storage
            .list_marks_by_student_impl(f.student_id, None)
            .await
            .unwrap();
        assert_eq!(grades[0].exam_name, "Midterm");
        assert_eq!(grades[0].subject_name, "Physics");
        assert_eq!(grades[0].display_grade, "P");
    }

    #[tokio::test]
    async fn test_out_of_range_marks_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;

        let err = storage
            .upsert_marks_impl(
                f.exam_id,
                f.subject_id,
                f.class_id,
                vec![MarkEntry {
                    student_id: f.student_id,
                    marks_obtained: 101.0,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
        assert!(
            storage
                .list_marks_by_exam_subject_impl(f.exam_id, f.subject_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_subject_from_other_class_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;
        let other = storage
            .create_class_impl(ClassRequest {
                name: "Grade 7".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();

        let err = storage
            .upsert_marks_impl(f.exam_id, f.subject_id, other.id, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_exam_delete_cascades_marks() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let f = fixture(&storage).await;
        storage
            .upsert_marks_impl(
                f.exam_id,
                f.subject_id,
                f.class_id,
                vec![MarkEntry {
                    student_id: f.student_id,
                    marks_obtained: 30.0,
                }],
            )
            .await
            .unwrap();

        let exams = storage.list_exams_impl().await.unwrap();
        assert_eq!(exams[0].mark_count, 1);

        storage.delete_exam_impl(f.exam_id).await.unwrap();
        assert!(
            storage
                .list_marks_by_student_impl(f.student_id, Some(5))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
