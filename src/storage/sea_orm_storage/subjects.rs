//! 科目存储操作

use super::students::class_names;
use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::prelude::*;
use crate::entity::subjects::{ActiveModel, Column};
use crate::errors::{PortalError, Result};
use crate::models::subjects::{
    entities::{Subject, SubjectWithClass},
    requests::CreateSubjectRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 科目列表（按班级），含班级名称
    pub async fn list_subjects_impl(&self) -> Result<Vec<SubjectWithClass>> {
        let subjects = Subjects::find()
            .order_by_asc(Column::ClassId)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询科目列表失败"))?;

        let names = class_names(&self.db, subjects.iter().map(|s| s.class_id)).await?;

        Ok(subjects
            .into_iter()
            .map(|m| SubjectWithClass {
                class_name: names.get(&m.class_id).cloned(),
                subject: m.into_subject(),
            })
            .collect())
    }

    pub async fn list_subjects_by_class_impl(&self, class_id: i64) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级科目失败"))?;
        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询科目失败"))?;
        Ok(result.map(|m| m.into_subject()))
    }

    /// 创建科目，班级必须存在
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let class_id = req
            .class_id
            .ok_or_else(|| PortalError::validation("Class is required"))?;

        let result = ActiveModel {
            name: Set(req.name.trim().to_string()),
            class_id: Set(class_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_error(e, "创建科目失败"))?;

        Ok(result.into_subject())
    }

    /// 删除科目，课程表与成绩由外键级联删除
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除科目失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::ClassRequest;

    #[tokio::test]
    async fn test_subject_requires_existing_class() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let err = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Math".to_string(),
                class_id: Some(42),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));

        let err = storage
            .create_subject_impl(CreateSubjectRequest {
                name: "Math".to_string(),
                class_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_subjects_with_class_name() {
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
        let subject = storage
            .create_subject_impl(CreateSubjectRequest {
                name: " Science ".to_string(),
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        assert_eq!(subject.name, "Science");

        let all = storage.list_subjects_impl().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].class_name.as_deref(), Some("Grade 3"));

        assert!(storage.delete_subject_impl(subject.id).await.unwrap());
        assert!(storage.list_subjects_by_class_impl(class.id).await.unwrap().is_empty());
    }
}
