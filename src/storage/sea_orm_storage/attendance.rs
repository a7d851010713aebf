//! 考勤存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::attendance::{ActiveModel, Column};
use crate::entity::prelude::*;
use crate::entity::students;
use crate::errors::{PortalError, Result};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus, DailyAttendanceTotals},
    responses::MarkAttendanceResponse,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 某班某日的考勤记录
    pub async fn list_attendance_for_class_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let student_ids = class_student_ids(&self.db, class_id).await?;
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = Attendance::find()
            .filter(Column::StudentId.is_in(student_ids))
            .filter(Column::Date.eq(date))
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询考勤记录失败"))?;
        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 提交考勤
    pub async fn mark_attendance_impl(
        &self,
        class_id: i64,
        date: NaiveDate,
        records: HashMap<i64, AttendanceStatus>,
    ) -> Result<MarkAttendanceResponse> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids = class_student_ids(&txn, class_id).await?;

        let mut existing: HashMap<i64, AttendanceModel> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            Attendance::find()
                .filter(Column::StudentId.is_in(student_ids.clone()))
                .filter(Column::Date.eq(date))
                .all(&txn)
                .await
                .map_err(|e| map_read_error(e, "查询考勤记录失败"))?
                .into_iter()
                .map(|m| (m.student_id, m))
                .collect()
        };

        let mut response = MarkAttendanceResponse {
            created: 0,
            updated: 0,
        };

        for student_id in student_ids {
            let Some(status) = records.get(&student_id) else {
                continue;
            };

            match existing.remove(&student_id) {
                Some(model) => {
                    let mut active: ActiveModel = model.into();
                    active.status = Set(status.to_string());
                    active
                        .update(&txn)
                        .await
                        .map_err(|e| map_write_error(e, "更新考勤失败"))?;
                    response.updated += 1;
                }
                None => {
                    ActiveModel {
                        student_id: Set(student_id),
                        date: Set(date),
                        status: Set(status.to_string()),
                        remarks: Set(None),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| map_write_error(e, "创建考勤失败"))?;
                    response.created += 1;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Attendance saved for class {} on {}: {} created, {} updated",
            class_id, date, response.created, response.updated
        );
        Ok(response)
    }

    /// 学生考勤记录（按日期倒序）
    pub async fn list_attendance_by_student_impl(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        let records = select
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生考勤失败"))?;
        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 某日全校考勤汇总
    pub async fn attendance_totals_on_impl(&self, date: NaiveDate) -> Result<DailyAttendanceTotals> {
        let statuses: Vec<String> = Attendance::find()
            .filter(Column::Date.eq(date))
            .select_only()
            .column(Column::Status)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询考勤汇总失败"))?;

        let mut totals = DailyAttendanceTotals {
            present: 0,
            absent: 0,
            late: 0,
        };
        for status in statuses {
            match status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => totals.present += 1,
                Ok(AttendanceStatus::Absent) => totals.absent += 1,
                Ok(AttendanceStatus::Late) => totals.late += 1,
                Err(_) => {}
            }
        }
        Ok(totals)
    }
}

async fn class_student_ids<C: ConnectionTrait>(conn: &C, class_id: i64) -> Result<Vec<i64>> {
    Students::find()
        .filter(students::Column::ClassId.eq(class_id))
        .select_only()
        .column(students::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询班级学生失败"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        attendance::entities::AttendanceSummary, classes::requests::ClassRequest,
        students::requests::CreateStudentRequest,
    };

    async fn class_with_students(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let class = storage
            .create_class_impl(ClassRequest {
                name: "Grade 2".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (name, admission) in [("Tom", "S1"), ("Ann", "S2")] {
            let detail = storage
                .create_student_impl(CreateStudentRequest {
                    name: name.to_string(),
                    surname: None,
                    email: format!("{admission}@school.test"),
                    admission_no: admission.to_string(),
                    roll_number: None,
                    class_id: Some(class.id),
                })
                .await
                .unwrap();
            ids.push(detail.student.id);
        }
        (class.id, ids[0], ids[1])
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_mark_attendance_upserts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (class_id, tom, ann) = class_with_students(&storage).await;

        let first = storage
            .mark_attendance_impl(
                class_id,
                day(3),
                HashMap::from([(tom, AttendanceStatus::Present), (ann, AttendanceStatus::Late)]),
            )
            .await
            .unwrap();
        assert_eq!((first.created, first.updated), (2, 0));

        let second = storage
            .mark_attendance_impl(
                class_id,
                day(3),
                HashMap::from([(tom, AttendanceStatus::Absent)]),
            )
            .await
            .unwrap();
        assert_eq!((second.created, second.updated), (0, 1));

        let records = storage
            .list_attendance_for_class_impl(class_id, day(3))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        let tom_record = records.iter().find(|r| r.student_id == tom).unwrap();
        assert_eq!(tom_record.status, AttendanceStatus::Absent);

        let totals = storage.attendance_totals_on_impl(day(3)).await.unwrap();
        assert_eq!((totals.present, totals.absent, totals.late), (0, 1, 1));
    }

    #[tokio::test]
    async fn test_students_outside_class_are_ignored() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (class_id, tom, _) = class_with_students(&storage).await;

        let result = storage
            .mark_attendance_impl(
                class_id,
                day(4),
                HashMap::from([(tom, AttendanceStatus::Present), (9999, AttendanceStatus::Present)]),
            )
            .await
            .unwrap();
        assert_eq!(result.created, 1);
    }

    #[tokio::test]
    async fn test_student_history_newest_first() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (class_id, tom, _) = class_with_students(&storage).await;

        for (d, status) in [
            (3, AttendanceStatus::Present),
            (5, AttendanceStatus::Late),
            (4, AttendanceStatus::Absent),
        ] {
            storage
                .mark_attendance_impl(class_id, day(d), HashMap::from([(tom, status)]))
                .await
                .unwrap();
        }

        let records = storage
            .list_attendance_by_student_impl(tom, None)
            .await
            .unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(5), day(4), day(3)]);

        let summary = AttendanceSummary::from_records(&records);
        assert_eq!(summary.percentage, 67);
        assert!(!summary.good_standing);

        let recent = storage
            .list_attendance_by_student_impl(tom, Some(2))
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
    }
}
