//! 考试存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::exams::{ActiveModel, Column};
use crate::entity::marks;
use crate::entity::prelude::*;
use crate::errors::Result;
use crate::models::exams::entities::{Exam, ExamSummary, NewExam};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use tracing::info;

impl SeaOrmStorage {
    /// 考试列表（新建的在前），含已录入成绩数
    pub async fn list_exams_impl(&self) -> Result<Vec<ExamSummary>> {
        let exams = self.list_exam_options_impl().await?;

        let exam_ids: Vec<i64> = Marks::find()
            .select_only()
            .column(marks::Column::ExamId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询成绩数量失败"))?;

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for exam_id in exam_ids {
            *counts.entry(exam_id).or_insert(0) += 1;
        }

        Ok(exams
            .into_iter()
            .map(|exam| ExamSummary {
                mark_count: counts.get(&exam.id).copied().unwrap_or(0),
                exam,
            })
            .collect())
    }

    pub async fn list_exam_options_impl(&self) -> Result<Vec<Exam>> {
        let exams = Exams::find()
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询考试列表失败"))?;
        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn get_exam_by_id_impl(&self, id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询考试失败"))?;
        Ok(result.map(|m| m.into_exam()))
    }

    pub async fn create_exam_impl(&self, exam: NewExam) -> Result<Exam> {
        let result = ActiveModel {
            name: Set(exam.name),
            term: Set(exam.term),
            start_date: Set(exam.start_date),
            end_date: Set(exam.end_date),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_write_error(e, "创建考试失败"))?;

        info!("Exam {} created: {}", result.id, result.name);
        Ok(result.into_exam())
    }

    /// 删除考试，成绩由外键级联删除
    pub async fn delete_exam_impl(&self, id: i64) -> Result<bool> {
        let result = Exams::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除考试失败"))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_exam(name: &str) -> NewExam {
        NewExam {
            name: name.to_string(),
            term: Some("Spring".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 9),
        }
    }

    #[tokio::test]
    async fn test_exams_newest_first() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage.create_exam_impl(new_exam("Midterm")).await.unwrap();
        let last = storage.create_exam_impl(new_exam("Final")).await.unwrap();

        let exams = storage.list_exams_impl().await.unwrap();
        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].exam.id, last.id);
        assert_eq!(exams[0].mark_count, 0);
        assert_eq!(exams[0].exam.start_date, NaiveDate::from_ymd_opt(2025, 5, 1));

        assert!(storage.delete_exam_impl(last.id).await.unwrap());
        assert!(storage.get_exam_by_id_impl(last.id).await.unwrap().is_none());
        assert!(!storage.delete_exam_impl(last.id).await.unwrap());
    }
}
