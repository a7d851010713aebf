//! 教师存储操作

use std::collections::HashMap;

use super::users::{delete_user_row, find_user_by_email, insert_user, update_linked_user};
use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::prelude::*;
use crate::entity::teachers::{ActiveModel, Column};
use crate::entity::users;
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo, normalize_page,
    teachers::{
        entities::{Teacher, TeacherDetail},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::entities::{UserRole, pending_external_id},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 分页列出教师
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Teachers::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::FullName.contains(&escaped));
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_error(e, "查询教师总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_error(e, "查询教师页数失败"))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_error(e, "查询教师列表失败"))?;

        let emails = user_emails(&self.db, teachers.iter().filter_map(|t| t.user_id)).await?;

        Ok(TeacherListResponse {
            items: teachers
                .into_iter()
                .map(|m| {
                    let email = m.user_id.and_then(|id| emails.get(&id).cloned());
                    TeacherDetail {
                        teacher: m.into_teacher(),
                        email,
                    }
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 全部教师（按姓名），用于课程表表单
    pub async fn list_all_teachers_impl(&self) -> Result<Vec<Teacher>> {
        let teachers = Teachers::find()
            .order_by_asc(Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师列表失败"))?;
        Ok(teachers.into_iter().map(|m| m.into_teacher()).collect())
    }

    /// 通过 ID 获取教师（含邮箱）
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<TeacherDetail>> {
        let Some(model) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?
        else {
            return Ok(None);
        };

        let emails = user_emails(&self.db, model.user_id).await?;
        let email = model.user_id.and_then(|id| emails.get(&id).cloned());
        Ok(Some(TeacherDetail {
            teacher: model.into_teacher(),
            email,
        }))
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?;
        Ok(result.map(|m| m.into_teacher()))
    }

    /// 创建教师
    ///
    /// 邮箱已有账号时将其提升为教师，否则创建待关联账号；
    /// 账号已有教师档案时直接返回该档案。
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
        let full_name = req.full_name();
        let email = req.email.trim().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let user = match find_user_by_email(&txn, &email).await? {
            Some(user) if user.role != UserRole::TEACHER => {
                let mut active: users::ActiveModel = user.into();
                active.role = Set(UserRole::Teacher.to_string());
                active.updated_at = Set(chrono::Utc::now().timestamp());
                let promoted = active
                    .update(&txn)
                    .await
                    .map_err(|e| map_write_error(e, "更新用户角色失败"))?;
                info!("Promoted user {} to teacher", promoted.id);
                promoted
            }
            Some(user) => user,
            None => {
                insert_user(
                    &txn,
                    pending_external_id(),
                    email.clone(),
                    full_name.clone(),
                    UserRole::Teacher,
                )
                .await?
            }
        };

        let existing = Teachers::find()
            .filter(Column::UserId.eq(user.id))
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?;

        let teacher = match existing {
            Some(teacher) => teacher,
            None => ActiveModel {
                user_id: Set(Some(user.id)),
                full_name: Set(full_name),
                specialization: Set(crate::utils::non_blank(req.specialization.as_deref())),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| map_write_error(e, "创建教师失败"))?,
        };

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(TeacherDetail {
            teacher: teacher.into_teacher(),
            email: Some(user.email),
        })
    }

    /// 更新教师档案及关联账号
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        let full_name = update.full_name();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(model) = Teachers::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?
        else {
            return Ok(None);
        };

        let user = update_linked_user(&txn, model.user_id, &full_name, &update.email).await?;

        let mut active: ActiveModel = model.into();
        active.full_name = Set(full_name);
        active.specialization = Set(crate::utils::non_blank(update.specialization.as_deref()));
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, "更新教师失败"))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(TeacherDetail {
            teacher: updated.into_teacher(),
            email: user.map(|u| u.email),
        }))
    }

    /// 删除教师
    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let Some(model) = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师失败"))?
        else {
            return Ok(false);
        };

        if let Some(user_id) = model.user_id {
            return delete_user_row(&self.db, user_id).await;
        }

        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除教师失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_teachers_impl(&self) -> Result<u64> {
        Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询教师总数失败"))
    }
}

/// 批量查询账号邮箱
pub(super) async fn user_emails<C, I>(conn: &C, user_ids: I) -> Result<HashMap<i64, String>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i64>,
{
    let ids: Vec<i64> = user_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Users::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询用户失败"))?;
    Ok(rows.into_iter().map(|u| (u.id, u.email)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(email: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            name: "Marie".to_string(),
            surname: Some("Curie".to_string()),
            email: email.to_string(),
            specialization: Some("Chemistry".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_teacher_creates_pending_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let detail = storage
            .create_teacher_impl(create_request("marie@school.test"))
            .await
            .unwrap();

        assert_eq!(detail.teacher.full_name, "Marie Curie");
        assert_eq!(detail.email.as_deref(), Some("marie@school.test"));

        let user_id = detail.teacher.user_id.unwrap();
        let user = storage.get_user_by_id_impl(user_id).await.unwrap().unwrap();
        assert!(user.is_pending());
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn test_create_teacher_promotes_existing_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let existing = storage
            .create_pending_user_impl("marie@school.test", "Marie", UserRole::Student)
            .await
            .unwrap();

        let detail = storage
            .create_teacher_impl(create_request("marie@school.test"))
            .await
            .unwrap();
        assert_eq!(detail.teacher.user_id, Some(existing.id));

        let user = storage.get_user_by_id_impl(existing.id).await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);

        // 已有档案时不会重复创建
        let again = storage
            .create_teacher_impl(create_request("marie@school.test"))
            .await
            .unwrap();
        assert_eq!(again.teacher.id, detail.teacher.id);
        assert_eq!(storage.count_teachers_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_teacher() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let detail = storage
            .create_teacher_impl(create_request("marie@school.test"))
            .await
            .unwrap();

        let updated = storage
            .update_teacher_impl(
                detail.teacher.id,
                UpdateTeacherRequest {
                    name: "Marie".to_string(),
                    surname: Some("Sklodowska".to_string()),
                    email: "msk@school.test".to_string(),
                    specialization: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.teacher.full_name, "Marie Sklodowska");
        assert_eq!(updated.email.as_deref(), Some("msk@school.test"));
        assert_eq!(updated.teacher.specialization, None);

        assert!(storage.delete_teacher_impl(detail.teacher.id).await.unwrap());
        assert_eq!(storage.count_teachers_impl().await.unwrap(), 0);
        // 账号随之删除
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);
        assert!(!storage.delete_teacher_impl(detail.teacher.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_teachers_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_teacher_impl(create_request("marie@school.test"))
            .await
            .unwrap();
        storage
            .create_teacher_impl(CreateTeacherRequest {
                name: "Alan".to_string(),
                surname: Some("Turing".to_string()),
                email: "alan@school.test".to_string(),
                specialization: None,
            })
            .await
            .unwrap();

        let all = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                page: None,
                size: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);
        // 新建的排在前面
        assert_eq!(all.items[0].teacher.full_name, "Alan Turing");

        let found = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                page: Some(1),
                size: Some(10),
                search: Some("curie".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].email.as_deref(), Some("marie@school.test"));
    }
}
