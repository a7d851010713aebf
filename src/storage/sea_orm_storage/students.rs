//! 学生存储操作

use std::collections::HashMap;

use super::teachers::user_emails;
use super::users::{delete_user_row, find_user_by_email, insert_user, update_linked_user};
use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::prelude::*;
use crate::entity::students::{ActiveModel, Column};
use crate::entity::{classes, parents};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo, normalize_page,
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::entities::{UserRole, pending_external_id},
};
use crate::utils::{escape_like_pattern, non_blank};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find();

        // 按姓名或学号搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::AdmissionNo.contains(&escaped)),
            );
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_error(e, "查询学生总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_error(e, "查询学生页数失败"))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_error(e, "查询学生列表失败"))?;

        Ok(StudentListResponse {
            items: student_details(&self.db, students).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 通过 ID 获取学生（含班级与家长名称）
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<StudentDetail>> {
        let Some(model) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生失败"))?
        else {
            return Ok(None);
        };

        Ok(student_details(&self.db, vec![model]).await?.pop())
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生失败"))?;
        Ok(result.map(|m| m.into_student()))
    }

    /// 创建学生：先建待关联账号，再建档案
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<StudentDetail> {
        let full_name = req.full_name();
        let admission_no = req.admission_no.trim().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_admission_available(&txn, &admission_no, None).await?;
        if find_user_by_email(&txn, &req.email).await?.is_some() {
            return Err(PortalError::conflict("Email is already in use"));
        }

        let user = insert_user(
            &txn,
            pending_external_id(),
            req.email.trim().to_string(),
            full_name.clone(),
            UserRole::Student,
        )
        .await?;

        let student = ActiveModel {
            user_id: Set(Some(user.id)),
            full_name: Set(full_name),
            admission_no: Set(admission_no),
            roll_number: Set(non_blank(req.roll_number.as_deref())),
            class_id: Set(req.class_id),
            parent_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, "创建学生失败"))?;

        let detail = student_details(&txn, vec![student]).await?.pop();

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        detail.ok_or_else(|| PortalError::database_operation("创建学生失败: 档案丢失"))
    }

    /// 更新学生档案及关联账号
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        let full_name = update.full_name();
        let admission_no = update.admission_no.trim().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(model) = Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询学生失败"))?
        else {
            return Ok(None);
        };

        ensure_admission_available(&txn, &admission_no, Some(id)).await?;
        update_linked_user(&txn, model.user_id, &full_name, &update.email).await?;

        let mut active: ActiveModel = model.into();
        active.full_name = Set(full_name);
        active.admission_no = Set(admission_no);
        active.class_id = Set(update.class_id);
        active.parent_id = Set(update.parent_id);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, "更新学生失败"))?;

        let detail = student_details(&txn, vec![updated]).await?.pop();

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(detail)
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let Some(model) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生失败"))?
        else {
            return Ok(false);
        };

        if let Some(user_id) = model.user_id {
            return delete_user_row(&self.db, user_id).await;
        }

        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除学生失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_impl(&self) -> Result<u64> {
        Students::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询学生总数失败"))
    }

    /// 班级学生（按姓名）
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询班级学生失败"))?;
        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }
}

/// 学号唯一性检查，`exclude` 为正在更新的学生
async fn ensure_admission_available<C: ConnectionTrait>(
    conn: &C,
    admission_no: &str,
    exclude: Option<i64>,
) -> Result<()> {
    let mut select = Students::find().filter(Column::AdmissionNo.eq(admission_no));
    if let Some(id) = exclude {
        select = select.filter(Column::Id.ne(id));
    }
    let taken = select
        .one(conn)
        .await
        .map_err(|e| map_read_error(e, "查询学号失败"))?;
    if taken.is_some() {
        return Err(PortalError::conflict("Admission number already exists"));
    }
    Ok(())
}

/// 批量补全邮箱、班级名称与家长姓名
async fn student_details<C: ConnectionTrait>(
    conn: &C,
    students: Vec<StudentModel>,
) -> Result<Vec<StudentDetail>> {
    let emails = user_emails(conn, students.iter().filter_map(|s| s.user_id)).await?;
    let class_names = class_names(conn, students.iter().filter_map(|s| s.class_id)).await?;

    let parent_ids: Vec<i64> = students.iter().filter_map(|s| s.parent_id).collect();
    let parent_names: HashMap<i64, String> = if parent_ids.is_empty() {
        HashMap::new()
    } else {
        Parents::find()
            .filter(parents::Column::Id.is_in(parent_ids))
            .all(conn)
            .await
            .map_err(|e| map_read_error(e, "查询家长失败"))?
            .into_iter()
            .map(|p| (p.id, p.full_name))
            .collect()
    };

    Ok(students
        .into_iter()
        .map(|m| StudentDetail {
            email: m.user_id.and_then(|id| emails.get(&id).cloned()),
            class_name: m.class_id.and_then(|id| class_names.get(&id).cloned()),
            parent_name: m.parent_id.and_then(|id| parent_names.get(&id).cloned()),
            student: m.into_student(),
        })
        .collect())
}

/// 批量查询班级名称
pub(super) async fn class_names<C, I>(conn: &C, class_ids: I) -> Result<HashMap<i64, String>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i64>,
{
    let ids: Vec<i64> = class_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Classes::find()
        .filter(classes::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询班级失败"))?;
    Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::ClassRequest;

    fn student_request(email: &str, admission_no: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            name: "Ada".to_string(),
            surname: Some("Lovelace".to_string()),
            email: email.to_string(),
            admission_no: admission_no.to_string(),
            roll_number: Some(" ".to_string()),
            class_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_student_with_class() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let class = storage
            .create_class_impl(ClassRequest {
                name: "Grade 5".to_string(),
                section: None,
                capacity: None,
                supervisor_id: None,
            })
            .await
            .unwrap();

        let mut req = student_request("ada@school.test", "ADM-001");
        req.class_id = Some(class.id);
        let detail = storage.create_student_impl(req).await.unwrap();

        assert_eq!(detail.student.full_name, "Ada Lovelace");
        assert_eq!(detail.student.roll_number, None);
        assert_eq!(detail.class_name.as_deref(), Some("Grade 5"));
        assert_eq!(detail.email.as_deref(), Some("ada@school.test"));
    }

    #[tokio::test]
    async fn test_duplicate_admission_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_student_impl(student_request("ada@school.test", "ADM-001"))
            .await
            .unwrap();

        let err = storage
            .create_student_impl(student_request("other@school.test", "ADM-001"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));
        // 事务回滚，未留下账号
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_class_is_validation_error() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let mut req = student_request("ada@school.test", "ADM-001");
        req.class_id = Some(999);
        let err = storage.create_student_impl(req).await.unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_student() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_student_impl(student_request("ada@school.test", "ADM-001"))
            .await
            .unwrap();
        let other = storage
            .create_student_impl(student_request("bob@school.test", "ADM-002"))
            .await
            .unwrap();

        let clash = storage
            .update_student_impl(
                other.student.id,
                UpdateStudentRequest {
                    name: "Bob".to_string(),
                    surname: None,
                    email: "bob@school.test".to_string(),
                    admission_no: "ADM-001".to_string(),
                    class_id: None,
                    parent_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(clash, PortalError::Conflict(_)));

        let updated = storage
            .update_student_impl(
                created.student.id,
                UpdateStudentRequest {
                    name: "Ada".to_string(),
                    surname: Some("King".to_string()),
                    email: "ada.king@school.test".to_string(),
                    admission_no: "ADM-001".to_string(),
                    class_id: None,
                    parent_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.student.full_name, "Ada King");
        assert_eq!(updated.email.as_deref(), Some("ada.king@school.test"));

        assert!(storage.delete_student_impl(created.student.id).await.unwrap());
        assert_eq!(storage.count_students_impl().await.unwrap(), 1);
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_by_admission_number() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_student_impl(student_request("ada@school.test", "ADM-001"))
            .await
            .unwrap();
        storage
            .create_student_impl(student_request("bob@school.test", "XYZ-9"))
            .await
            .unwrap();

        let found = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: None,
                size: None,
                search: Some("xyz".to_string()),
                class_id: None,
            })
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);
        assert_eq!(found.items[0].student.admission_no, "XYZ-9");
    }
}
