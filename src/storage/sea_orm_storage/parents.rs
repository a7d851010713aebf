//! 家长存储操作

use std::collections::HashMap;

use super::students::class_names;
use super::teachers::user_emails;
use super::users::{delete_user_row, find_user_by_email, insert_user, update_linked_user};
use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::parents::{ActiveModel, Column};
use crate::entity::prelude::*;
use crate::entity::students;
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo, normalize_page,
    parents::{
        entities::{ChildSummary, Parent, ParentDetail},
        requests::{CreateParentRequest, ParentListQuery, UpdateParentRequest},
        responses::ParentListResponse,
    },
    users::entities::{UserRole, pending_external_id},
};
use crate::utils::{escape_like_pattern, non_blank};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 分页列出家长（含子女）
    pub async fn list_parents_with_pagination_impl(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Parents::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FullName.contains(&escaped))
                    .add(Column::Phone.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_read_error(e, "查询家长总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_read_error(e, "查询家长页数失败"))?;
        let parents = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_read_error(e, "查询家长列表失败"))?;

        Ok(ParentListResponse {
            items: parent_details(&self.db, parents).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 通过 ID 获取家长（含子女）
    pub async fn get_parent_by_id_impl(&self, id: i64) -> Result<Option<ParentDetail>> {
        let Some(model) = Parents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询家长失败"))?
        else {
            return Ok(None);
        };
        Ok(parent_details(&self.db, vec![model]).await?.pop())
    }

    pub async fn get_parent_by_user_id_impl(&self, user_id: i64) -> Result<Option<Parent>> {
        let result = Parents::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询家长失败"))?;
        Ok(result.map(|m| m.into_parent()))
    }

    /// 创建家长并关联子女
    pub async fn create_parent_impl(&self, req: CreateParentRequest) -> Result<ParentDetail> {
        let full_name = req.full_name();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        if find_user_by_email(&txn, &req.email).await?.is_some() {
            return Err(PortalError::conflict("Email is already in use"));
        }

        let user = insert_user(
            &txn,
            pending_external_id(),
            req.email.trim().to_string(),
            full_name.clone(),
            UserRole::Parent,
        )
        .await?;

        let parent = ActiveModel {
            user_id: Set(Some(user.id)),
            full_name: Set(full_name),
            phone: Set(non_blank(Some(req.phone.as_str()))),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, "创建家长失败"))?;

        link_children(&txn, parent.id, &req.student_ids).await?;
        let detail = parent_details(&txn, vec![parent]).await?.pop();

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        detail.ok_or_else(|| PortalError::database_operation("创建家长失败: 档案丢失"))
    }

    /// 更新家长档案、关联账号与子女集合
    pub async fn update_parent_impl(
        &self,
        id: i64,
        update: UpdateParentRequest,
    ) -> Result<Option<ParentDetail>> {
        let full_name = update.full_name();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(model) = Parents::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_read_error(e, "查询家长失败"))?
        else {
            return Ok(None);
        };

        update_linked_user(&txn, model.user_id, &full_name, &update.email).await?;

        let mut active: ActiveModel = model.into();
        active.full_name = Set(full_name);
        active.phone = Set(non_blank(Some(update.phone.as_str())));
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| map_write_error(e, "更新家长失败"))?;

        // 先解除不在新集合中的子女，再关联新集合
        let mut unlink = Students::update_many()
            .col_expr(students::Column::ParentId, Expr::value(Option::<i64>::None))
            .filter(students::Column::ParentId.eq(id));
        if !update.student_ids.is_empty() {
            unlink = unlink.filter(students::Column::Id.is_not_in(update.student_ids.clone()));
        }
        unlink
            .exec(&txn)
            .await
            .map_err(|e| map_write_error(e, "解除子女关联失败"))?;
        link_children(&txn, id, &update.student_ids).await?;

        let detail = parent_details(&txn, vec![updated]).await?.pop();

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(detail)
    }

    /// 删除家长，子女的 parent_id 由外键置空
    pub async fn delete_parent_impl(&self, id: i64) -> Result<bool> {
        let Some(model) = Parents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询家长失败"))?
        else {
            return Ok(false);
        };

        if let Some(user_id) = model.user_id {
            return delete_user_row(&self.db, user_id).await;
        }

        let result = Parents::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除家长失败"))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn list_children_of_parent_impl(&self, parent_id: i64) -> Result<Vec<ChildSummary>> {
        let mut children = children_by_parent(&self.db, &[parent_id]).await?;
        Ok(children.remove(&parent_id).unwrap_or_default())
    }

    pub async fn parent_has_child_in_class_impl(
        &self,
        parent_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        let count = Students::find()
            .filter(students::Column::ParentId.eq(parent_id))
            .filter(students::Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询子女失败"))?;
        Ok(count > 0)
    }
}

async fn link_children<C: ConnectionTrait>(
    conn: &C,
    parent_id: i64,
    student_ids: &[i64],
) -> Result<()> {
    if student_ids.is_empty() {
        return Ok(());
    }
    Students::update_many()
        .col_expr(students::Column::ParentId, Expr::value(parent_id))
        .filter(students::Column::Id.is_in(student_ids.to_vec()))
        .exec(conn)
        .await
        .map_err(|e| map_write_error(e, "关联子女失败"))?;
    Ok(())
}

/// 按家长分组的子女（按姓名）
async fn children_by_parent<C: ConnectionTrait>(
    conn: &C,
    parent_ids: &[i64],
) -> Result<HashMap<i64, Vec<ChildSummary>>> {
    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Students::find()
        .filter(students::Column::ParentId.is_in(parent_ids.to_vec()))
        .order_by_asc(students::Column::FullName)
        .all(conn)
        .await
        .map_err(|e| map_read_error(e, "查询子女失败"))?;
    let names = class_names(conn, rows.iter().filter_map(|s| s.class_id)).await?;

    let mut grouped: HashMap<i64, Vec<ChildSummary>> = HashMap::new();
    for row in rows {
        let Some(parent_id) = row.parent_id else {
            continue;
        };
        grouped.entry(parent_id).or_default().push(ChildSummary {
            id: row.id,
            class_name: row.class_id.and_then(|id| names.get(&id).cloned()),
            full_name: row.full_name,
            admission_no: row.admission_no,
            class_id: row.class_id,
        });
    }
    Ok(grouped)
}

async fn parent_details<C: ConnectionTrait>(
    conn: &C,
    parents: Vec<ParentModel>,
) -> Result<Vec<ParentDetail>> {
    let ids: Vec<i64> = parents.iter().map(|p| p.id).collect();
    let mut children = children_by_parent(conn, &ids).await?;
    let emails = user_emails(conn, parents.iter().filter_map(|p| p.user_id)).await?;

    Ok(parents
        .into_iter()
        .map(|m| ParentDetail {
            email: m.user_id.and_then(|id| emails.get(&id).cloned()),
            children: children.remove(&m.id).unwrap_or_default(),
            parent: m.into_parent(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{classes::requests::ClassRequest, students::requests::CreateStudentRequest};

    async fn student(storage: &SeaOrmStorage, email: &str, admission: &str, name: &str) -> i64 {
        storage
            .create_student_impl(CreateStudentRequest {
                name: name.to_string(),
                surname: None,
                email: email.to_string(),
                admission_no: admission.to_string(),
                roll_number: None,
                class_id: None,
            })
            .await
            .unwrap()
            .student
            .id
    }

    #[tokio::test]
    async fn test_create_parent_links_children() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let tom = student(&storage, "tom@school.test", "A1", "Tom").await;
        let ann = student(&storage, "ann@school.test", "A2", "Ann").await;

        let parent = storage
            .create_parent_impl(CreateParentRequest {
                name: "Jane".to_string(),
                surname: Some("Doe".to_string()),
                email: "jane@home.test".to_string(),
                phone: "555-0100".to_string(),
                student_ids: vec![tom, ann],
            })
            .await
            .unwrap();

        assert_eq!(parent.parent.full_name, "Jane Doe");
        let names: Vec<_> = parent.children.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Tom"]);

        let detail = storage.get_student_by_id_impl(tom).await.unwrap().unwrap();
        assert_eq!(detail.parent_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_update_parent_resets_children() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let tom = student(&storage, "tom@school.test", "A1", "Tom").await;
        let ann = student(&storage, "ann@school.test", "A2", "Ann").await;

        let parent = storage
            .create_parent_impl(CreateParentRequest {
                name: "Jane".to_string(),
                surname: None,
                email: "jane@home.test".to_string(),
                phone: "555-0100".to_string(),
                student_ids: vec![tom],
            })
            .await
            .unwrap();

        let updated = storage
            .update_parent_impl(
                parent.parent.id,
                UpdateParentRequest {
                    name: "Jane".to_string(),
                    surname: None,
                    email: "jane@home.test".to_string(),
                    phone: "555-0199".to_string(),
                    student_ids: vec![ann],
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.parent.phone.as_deref(), Some("555-0199"));
        assert_eq!(updated.children.len(), 1);
        assert_eq!(updated.children[0].id, ann);

        let tom_detail = storage.get_student_by_id_impl(tom).await.unwrap().unwrap();
        assert_eq!(tom_detail.student.parent_id, None);
    }

    #[tokio::test]
    async fn test_delete_parent_unlinks_children() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let tom = student(&storage, "tom@school.test", "A1", "Tom").await;
        let parent = storage
            .create_parent_impl(CreateParentRequest {
                name: "Jane".to_string(),
                surname: None,
                email: "jane@home.test".to_string(),
                phone: "555-0100".to_string(),
                student_ids: vec![tom],
            })
            .await
            .unwrap();

        assert!(storage.delete_parent_impl(parent.parent.id).await.unwrap());
        let tom_detail = storage.get_student_by_id_impl(tom).await.unwrap().unwrap();
        assert_eq!(tom_detail.student.parent_id, None);
        assert!(
            storage
                .get_parent_by_id_impl(parent.parent.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_parent_has_child_in_class() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let mut class_ids = Vec::new();
        for name in ["A", "B"] {
            let class = storage
                .create_class_impl(ClassRequest {
                    name: name.to_string(),
                    section: None,
                    capacity: None,
                    supervisor_id: None,
                })
                .await
                .unwrap();
            class_ids.push(class.id);
        }
        let (class_a, class_b) = (class_ids[0], class_ids[1]);

        let mut enrolled = Vec::new();
        for (name, admission, class_id) in [("Tom", "A1", class_a), ("Zed", "A2", class_b)] {
            let detail = storage
                .create_student_impl(CreateStudentRequest {
                    name: name.to_string(),
                    surname: None,
                    email: format!("{admission}@school.test"),
                    admission_no: admission.to_string(),
                    roll_number: None,
                    class_id: Some(class_id),
                })
                .await
                .unwrap();
            enrolled.push(detail.student.id);
        }
        let tom = enrolled[0];

        let parent = storage
            .create_parent_impl(CreateParentRequest {
                name: "Jane".to_string(),
                surname: None,
                email: "jane@home.test".to_string(),
                phone: "555-0100".to_string(),
                student_ids: vec![tom],
            })
            .await
            .unwrap();
        let parent_id = parent.parent.id;

        assert!(storage.parent_has_child_in_class_impl(parent_id, class_a).await.unwrap());
        // 其他家长的孩子所在班级
        assert!(!storage.parent_has_child_in_class_impl(parent_id, class_b).await.unwrap());
    }
}
