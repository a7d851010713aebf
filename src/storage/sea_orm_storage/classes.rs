//! 班级存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::classes::{ActiveModel, Column};
use crate::entity::prelude::*;
use crate::entity::{class_routines, marks, students, subjects, teachers};
use crate::errors::{PortalError, Result};
use crate::models::{
    classes::{
        entities::{Class, ClassDetail, ClassSummary, TeacherClass},
        requests::{CreateClassRequest, RollNumberEntry, UpdateClassRequest},
    },
    subjects::entities::Subject,
};
use crate::utils::non_blank;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 班级列表（按名称），含学生数与班主任姓名
    pub async fn list_classes_impl(&self) -> Result<Vec<ClassSummary>> {
        let classes = Classes::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级列表失败"))?;

        let counts = student_counts(&self.db).await?;
        let supervisor_ids: Vec<i64> = classes.iter().filter_map(|c| c.supervisor_id).collect();
        let supervisors: HashMap<i64, String> = if supervisor_ids.is_empty() {
            HashMap::new()
        } else {
            Teachers::find()
                .filter(teachers::Column::Id.is_in(supervisor_ids))
                .all(&self.db)
                .await
                .map_err(|e| map_read_error(e, "查询班主任失败"))?
                .into_iter()
                .map(|t| (t.id, t.full_name))
                .collect()
        };

        Ok(classes
            .into_iter()
            .map(|m| ClassSummary {
                supervisor_name: m.supervisor_id.and_then(|id| supervisors.get(&id).cloned()),
                student_count: counts.get(&m.id).copied().unwrap_or(0),
                class: m.into_class(),
            })
            .collect())
    }

    /// 班级选项（按名称）
    pub async fn list_class_options_impl(&self) -> Result<Vec<Class>> {
        let classes = Classes::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级列表失败"))?;
        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级失败"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 班级详情：班主任与学生（按座号、姓名）
    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let Some(model) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级失败"))?
        else {
            return Ok(None);
        };

        let supervisor = match model.supervisor_id {
            Some(id) => Teachers::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(|e| map_read_error(e, "查询班主任失败"))?
                .map(|t| t.into_teacher()),
            None => None,
        };

        let students = Students::find()
            .filter(students::Column::ClassId.eq(class_id))
            .order_by_asc(students::Column::RollNumber)
            .order_by_asc(students::Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级学生失败"))?;

        Ok(Some(ClassDetail {
            class: model.into_class(),
            supervisor,
            students: students.into_iter().map(|s| s.into_student()).collect(),
        }))
    }

    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            section: Set(req.section_or_none()),
            capacity: Set(req.capacity_or_default()),
            supervisor_id: Set(req.supervisor_id),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建班级失败"))?;

        Ok(result.into_class())
    }

    /// 更新班级
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        let Some(model) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级失败"))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.name = Set(update.name.trim().to_string());
        active.section = Set(update.section_or_none());
        active.capacity = Set(update.capacity_or_default());
        active.supervisor_id = Set(update.supervisor_id);

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新班级失败"))?;

        Ok(Some(updated.into_class()))
    }

    /// 批量更新座号，空字符串清空座号
    pub async fn update_roll_numbers_impl(
        &self,
        class_id: i64,
        entries: Vec<RollNumberEntry>,
    ) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let mut updated = 0;
        for entry in entries {
            let result = Students::update_many()
                .col_expr(
                    students::Column::RollNumber,
                    Expr::value(non_blank(Some(entry.roll_number.as_str()))),
                )
                .filter(students::Column::Id.eq(entry.student_id))
                .filter(students::Column::ClassId.eq(class_id))
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, "更新座号失败"))?;
            updated += result.rows_affected;
        }

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    /// 删除班级
    ///
    /// 学生取消分班，删除课程表、该班科目的成绩、科目，最后删除班级，
    /// 全部在同一事务内完成。
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        if Classes::find_by_id(class_id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询班级失败"))?
            .is_none()
        {
            return Ok(false);
        }

        Students::update_many()
            .col_expr(students::Column::ClassId, Expr::value(Option::<i64>::None))
            .filter(students::Column::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "学生取消分班失败"))?;

        ClassRoutines::delete_many()
            .filter(class_routines::Column::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "删除课程表失败"))?;

        let subject_ids: Vec<i64> = Subjects::find()
            .filter(subjects::Column::ClassId.eq(class_id))
            .select_only()
            .column(subjects::Column::Id)
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询班级科目失败"))?;

        if !subject_ids.is_empty() {
            Marks::delete_many()
                .filter(marks::Column::SubjectId.is_in(subject_ids))
                .exec(&txn)
                .await
                .map_err(|e| map_write_error(e, "删除成绩失败"))?;
        }

        Subjects::delete_many()
            .filter(subjects::Column::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "删除科目失败"))?;

        let result = Classes::delete_by_id(class_id)
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "删除班级失败"))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        info!("Class {} deleted with its schedule, subjects and marks", class_id);
        Ok(result.rows_affected > 0)
    }

    pub async fn count_classes_impl(&self) -> Result<u64> {
        Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级总数失败"))
    }

    /// 教师有课的班级（按名称），含学生数与该班全部科目
    pub async fn list_teacher_classes_impl(&self, teacher_id: i64) -> Result<Vec<TeacherClass>> {
        let class_ids: Vec<i64> = ClassRoutines::find()
            .filter(class_routines::Column::TeacherId.eq(teacher_id))
            .select_only()
            .column(class_routines::Column::ClassId)
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询任课班级失败"))?;

        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let classes = Classes::find()
            .filter(Column::Id.is_in(class_ids.clone()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级列表失败"))?;

        let counts = student_counts(&self.db).await?;

        let mut subjects_by_class: HashMap<i64, Vec<Subject>> = HashMap::new();
        for subject in Subjects::find()
            .filter(subjects::Column::ClassId.is_in(class_ids))
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级科目失败"))?
        {
            subjects_by_class
                .entry(subject.class_id)
                .or_default()
                .push(subject.into_subject());
        }

        Ok(classes
            .into_iter()
            .map(|m| TeacherClass {
                student_count: counts.get(&m.id).copied().unwrap_or(0),
                subjects: subjects_by_class.remove(&m.id).unwrap_or_default(),
                class: m.into_class(),
            })
            .collect())
    }

    /// 教师在该班级是否有课
    pub async fn teacher_teaches_class_impl(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        let count = ClassRoutines::find()
            .filter(class_routines::Column::TeacherId.eq(teacher_id))
            .filter(class_routines::Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询任课信息失败"))?;
        Ok(count > 0)
    }
}

/// 各班学生数
pub(super) async fn student_counts<C: ConnectionTrait>(conn: &C) -> Result<HashMap<i64, i64>> {
    let class_ids: Vec<Option<i64>> = Students::find()
        .filter(students::Column::ClassId.is_not_null())
        .select_only()
        .column(students::Column::ClassId)
        .into_tuple::<Option<i64>>()
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询班级人数失败"))?;

    let mut counts = HashMap::new();
    for class_id in class_ids.into_iter().flatten() {
        *counts.entry(class_id).or_insert(0) += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        classes::requests::ClassRequest,
        schedule::entities::{DayOfWeek, NewRoutine},
        students::requests::CreateStudentRequest,
        subjects::requests::CreateSubjectRequest,
        teachers::requests::CreateTeacherRequest,
    };
    use chrono::NaiveTime;

    fn class_request(name: &str) -> ClassRequest {
        ClassRequest {
            name: name.to_string(),
            section: Some("A".to_string()),
            capacity: Some(serde_json::json!("not a number")),
            supervisor_id: None,
        }
    }

    async fn student_in(storage: &SeaOrmStorage, class_id: i64, name: &str, admission: &str) -> i64 {
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

    #[tokio::test]
    async fn test_create_class_defaults_capacity() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let class = storage.create_class_impl(class_request("Grade 1")).await.unwrap();
        assert_eq!(class.capacity, 30);
        assert_eq!(class.section.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_list_classes_with_counts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let b = storage.create_class_impl(class_request("B")).await.unwrap();
        storage.create_class_impl(class_request("A")).await.unwrap();
        student_in(&storage, b.id, "Tom", "S1").await;
        student_in(&storage, b.id, "Ann", "S2").await;

        let classes = storage.list_classes_impl().await.unwrap();
        assert_eq!(classes[0].class.name, "A");
        assert_eq!(classes[0].student_count, 0);
        assert_eq!(classes[1].student_count, 2);
    }

    #[tokio::test]
    async fn test_roll_numbers_only_touch_class_members() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let class = storage.create_class_impl(class_request("A")).await.unwrap();
        let other = storage.create_class_impl(class_request("B")).await.unwrap();
        let tom = student_in(&storage, class.id, "Tom", "S1").await;
        let ann = student_in(&storage, class.id, "Ann", "S2").await;
        let outsider = student_in(&storage, other.id, "Zed", "S3").await;

        let updated = storage
            .update_roll_numbers_impl(
                class.id,
                vec![
                    RollNumberEntry {
                        student_id: tom,
                        roll_number: "2".to_string(),
                    },
                    RollNumberEntry {
                        student_id: ann,
                        roll_number: "1".to_string(),
                    },
                    RollNumberEntry {
                        student_id: outsider,
                        roll_number: "9".to_string(),
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let detail = storage.get_class_detail_impl(class.id).await.unwrap().unwrap();
        let names: Vec<_> = detail.students.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Tom"]);

        // 空字符串清空座号
        storage
            .update_roll_numbers_impl(
                class.id,
                vec![RollNumberEntry {
                    student_id: tom,
                    roll_number: "".to_string(),
                }],
            )
            .await
            .unwrap();
        let tom_detail = storage.get_student_by_id_impl(tom).await.unwrap().unwrap();
        assert_eq!(tom_detail.student.roll_number, None);
    }

    async fn teacher(storage: &SeaOrmStorage, name: &str) -> i64 {
        storage
            .create_teacher_impl(CreateTeacherRequest {
                name: name.to_string(),
                surname: None,
                email: format!("{}@school.test", name.to_lowercase()),
                specialization: None,
            })
            .await
            .unwrap()
            .teacher
            .id
    }

    async fn subject_in(storage: &SeaOrmStorage, class_id: i64, name: &str) -> i64 {
        storage
            .create_subject_impl(CreateSubjectRequest {
                name: name.to_string(),
                class_id: Some(class_id),
            })
            .await
            .unwrap()
            .id
    }

    async fn routine(storage: &SeaOrmStorage, class_id: i64, subject_id: i64, teacher_id: i64) {
        storage
            .create_routine_impl(NewRoutine {
                class_id,
                subject_id,
                teacher_id: Some(teacher_id),
                day_of_week: DayOfWeek::Tuesday,
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_teacher_teaches_only_classes_with_routines() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let taught = storage.create_class_impl(class_request("A")).await.unwrap();
        let other = storage.create_class_impl(class_request("B")).await.unwrap();
        let alan = teacher(&storage, "Alan").await;
        let bea = teacher(&storage, "Bea").await;
        let math = subject_in(&storage, taught.id, "Math").await;
        routine(&storage, taught.id, math, alan).await;

        assert!(storage.teacher_teaches_class_impl(alan, taught.id).await.unwrap());
        assert!(!storage.teacher_teaches_class_impl(alan, other.id).await.unwrap());
        // 没有任何课的教师
        assert!(!storage.teacher_teaches_class_impl(bea, taught.id).await.unwrap());
        assert!(storage.list_teacher_classes_impl(bea).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_teacher_classes() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let b = storage.create_class_impl(class_request("B")).await.unwrap();
        let a = storage.create_class_impl(class_request("A")).await.unwrap();
        let untaught = storage.create_class_impl(class_request("C")).await.unwrap();
        let alan = teacher(&storage, "Alan").await;
        student_in(&storage, a.id, "Tom", "S1").await;
        student_in(&storage, a.id, "Ann", "S2").await;
        student_in(&storage, untaught.id, "Zed", "S3").await;

        let math = subject_in(&storage, a.id, "Math").await;
        subject_in(&storage, a.id, "Art").await;
        let physics = subject_in(&storage, b.id, "Physics").await;
        subject_in(&storage, untaught.id, "Music").await;
        routine(&storage, a.id, math, alan).await;
        routine(&storage, a.id, math, alan).await;
        routine(&storage, b.id, physics, alan).await;

        let classes = storage.list_teacher_classes_impl(alan).await.unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.class.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        assert_eq!(classes[0].student_count, 2);
        // 班级全部科目，不限于该教师任课的科目
        let subjects: Vec<_> = classes[0].subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(subjects, vec!["Art", "Math"]);

        assert_eq!(classes[1].student_count, 0);
        assert_eq!(classes[1].subjects.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_class_cleans_up() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let class = storage.create_class_impl(class_request("A")).await.unwrap();
        let tom = student_in(&storage, class.id, "Tom", "S1").await;
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Math".to_string(),
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        let teacher = storage
            .create_teacher_impl(CreateTeacherRequest {
                name: "Alan".to_string(),
                surname: None,
                email: "alan@school.test".to_string(),
                specialization: None,
            })
            .await
            .unwrap();
        storage
            .create_routine_impl(NewRoutine {
                class_id: class.id,
                subject_id: subject.id,
                teacher_id: Some(teacher.teacher.id),
                day_of_week: DayOfWeek::Monday,
                start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        assert!(
            storage
                .teacher_teaches_class_impl(teacher.teacher.id, class.id)
                .await
                .unwrap()
        );
        let mine = storage
            .list_teacher_classes_impl(teacher.teacher.id)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].student_count, 1);
        assert_eq!(mine[0].subjects.len(), 1);

        assert!(storage.delete_class_impl(class.id).await.unwrap());
        assert!(storage.get_class_by_id_impl(class.id).await.unwrap().is_none());
        assert!(storage.get_subject_by_id_impl(subject.id).await.unwrap().is_none());
        assert!(
            storage
                .list_teacher_classes_impl(teacher.teacher.id)
                .await
                .unwrap()
                .is_empty()
        );
        let tom_detail = storage.get_student_by_id_impl(tom).await.unwrap().unwrap();
        assert_eq!(tom_detail.student.class_id, None);

        assert!(!storage.delete_class_impl(class.id).await.unwrap());
    }
}
