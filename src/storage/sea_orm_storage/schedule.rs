//! 课程表存储操作

use std::collections::HashMap;

use super::students::class_names;
use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::class_routines::{ActiveModel, Column};
use crate::entity::prelude::*;
use crate::entity::{subjects, teachers};
use crate::errors::{PortalError, Result};
use crate::models::schedule::entities::{
    ClassRoutineCount, DayOfWeek, NewRoutine, Routine, RoutineDetail,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

impl SeaOrmStorage {
    /// 班级（按名称）及其课程数量
    pub async fn list_class_routine_counts_impl(&self) -> Result<Vec<ClassRoutineCount>> {
        let classes = self.list_class_options_impl().await?;

        let class_ids: Vec<i64> = ClassRoutines::find()
            .select_only()
            .column(Column::ClassId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询课程数量失败"))?;

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for class_id in class_ids {
            *counts.entry(class_id).or_insert(0) += 1;
        }

        Ok(classes
            .into_iter()
            .map(|class| ClassRoutineCount {
                routine_count: counts.get(&class.id).copied().unwrap_or(0),
                class,
            })
            .collect())
    }

    /// 班级课程（按开始时间）
    pub async fn list_routines_by_class_impl(&self, class_id: i64) -> Result<Vec<RoutineDetail>> {
        let routines = ClassRoutines::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级课程表失败"))?;
        routine_details(&self.db, routines).await
    }

    /// 教师课程（按开始时间），可限定星期
    pub async fn list_routines_by_teacher_impl(
        &self,
        teacher_id: i64,
        day: Option<DayOfWeek>,
    ) -> Result<Vec<RoutineDetail>> {
        let mut select = ClassRoutines::find().filter(Column::TeacherId.eq(teacher_id));
        if let Some(day) = day {
            select = select.filter(Column::DayOfWeek.eq(day.as_str()));
        }
        let routines = select
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师课程表失败"))?;
        routine_details(&self.db, routines).await
    }

    /// 创建课程，科目必须属于该班级
    pub async fn create_routine_impl(&self, routine: NewRoutine) -> Result<Routine> {
        let subject = Subjects::find_by_id(routine.subject_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询科目失败"))?
            .ok_or_else(|| PortalError::validation("Subject not found"))?;
        if subject.class_id != routine.class_id {
            return Err(PortalError::validation(
                "Subject does not belong to this class",
            ));
        }

        let result = ActiveModel {
            class_id: Set(routine.class_id),
            subject_id: Set(routine.subject_id),
            teacher_id: Set(routine.teacher_id),
            day_of_week: Set(routine.day_of_week.to_string()),
            start_time: Set(routine.start_time),
            end_time: Set(routine.end_time),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_error(e, "创建课程失败"))?;

        info!(
            "Routine {} created for class {} on {}",
            result.id, result.class_id, result.day_of_week
        );
        Ok(result.into_routine())
    }

    /// 删除课程，返回被删除的条目
    pub async fn delete_routine_impl(&self, id: i64) -> Result<Option<Routine>> {
        let Some(model) = ClassRoutines::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询课程失败"))?
        else {
            return Ok(None);
        };

        ClassRoutines::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除课程失败"))?;

        Ok(Some(model.into_routine()))
    }
}

/// 补全班级、科目与教师名称，保持输入顺序
async fn routine_details<C: ConnectionTrait>(
    conn: &C,
    routines: Vec<ClassRoutineModel>,
) -> Result<Vec<RoutineDetail>> {
    if routines.is_empty() {
        return Ok(Vec::new());
    }

    let classes = class_names(conn, routines.iter().map(|r| r.class_id)).await?;

    let subject_ids: Vec<i64> = routines.iter().map(|r| r.subject_id).collect();
    let subject_names: HashMap<i64, String> = Subjects::find()
        .filter(subjects::Column::Id.is_in(subject_ids))
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询科目失败"))?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let teacher_ids: Vec<i64> = routines.iter().filter_map(|r| r.teacher_id).collect();
    let teacher_names: HashMap<i64, String> = if teacher_ids.is_empty() {
        HashMap::new()
    } else {
        Teachers::find()
            .filter(teachers::Column::Id.is_in(teacher_ids))
            .all(conn)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?
            .into_iter()
            .map(|t| (t.id, t.full_name))
            .collect()
    };

    Ok(routines
        .into_iter()
        .map(|m| RoutineDetail {
            class_name: classes.get(&m.class_id).cloned().unwrap_or_default(),
            subject_name: subject_names.get(&m.subject_id).cloned().unwrap_or_default(),
            teacher_name: m.teacher_id.and_then(|id| teacher_names.get(&id).cloned()),
            routine: m.into_routine(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        classes::requests::ClassRequest, subjects::requests::CreateSubjectRequest,
        teachers::requests::CreateTeacherRequest,
    };
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    async fn setup(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let class = storage
            .create_class_impl(ClassRequest {
                name: "Grade 4".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "History".to_string(),
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        let teacher = storage
            .create_teacher_impl(CreateTeacherRequest {
                name: "Herodotus".to_string(),
                surname: None,
                email: "hero@school.test".to_string(),
                specialization: None,
            })
            .await
            .unwrap();
        (class.id, subject.id, teacher.teacher.id)
    }

    #[tokio::test]
    async fn test_routines_ordered_by_start_time() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (class_id, subject_id, teacher_id) = setup(&storage).await;

        for (day, start, end) in [
            (DayOfWeek::Monday, at(10, 0), at(11, 0)),
            (DayOfWeek::Monday, at(8, 0), at(9, 0)),
            (DayOfWeek::Tuesday, at(9, 0), at(10, 0)),
        ] {
            storage
                .create_routine_impl(NewRoutine {
                    class_id,
                    subject_id,
                    teacher_id: Some(teacher_id),
                    day_of_week: day,
                    start_time: start,
                    end_time: end,
                })
                .await
                .unwrap();
        }

        let monday = storage
            .list_routines_by_teacher_impl(teacher_id, Some(DayOfWeek::Monday))
            .await
            .unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].routine.start_time, at(8, 0));
        assert_eq!(monday[0].subject_name, "History");
        assert_eq!(monday[0].teacher_name.as_deref(), Some("Herodotus"));

        let all = storage.list_routines_by_class_impl(class_id).await.unwrap();
        assert_eq!(all.len(), 3);

        let counts = storage.list_class_routine_counts_impl().await.unwrap();
        assert_eq!(counts[0].routine_count, 3);
    }

    #[tokio::test]
    async fn test_subject_must_belong_to_class() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (_, subject_id, _) = setup(&storage).await;
        let other = storage
            .create_class_impl(ClassRequest {
                name: "Grade 9".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();

        let err = storage
            .create_routine_impl(NewRoutine {
                class_id: other.id,
                subject_id,
                teacher_id: None,
                day_of_week: DayOfWeek::Friday,
                start_time: at(8, 0),
                end_time: at(9, 0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_routine() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (class_id, subject_id, _) = setup(&storage).await;
        let routine = storage
            .create_routine_impl(NewRoutine {
                class_id,
                subject_id,
                teacher_id: None,
                day_of_week: DayOfWeek::Wednesday,
                start_time: at(8, 0),
                end_time: at(9, 0),
            })
            .await
            .unwrap();

        let deleted = storage.delete_routine_impl(routine.id).await.unwrap();
        assert_eq!(deleted.map(|r| r.class_id), Some(class_id));
        assert!(storage.delete_routine_impl(routine.id).await.unwrap().is_none());
    }
}
