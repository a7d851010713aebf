//! 用户存储操作与身份同步

use super::{SeaOrmStorage, map_read_error, map_write_error};
use crate::entity::prelude::*;
use crate::entity::users::{ActiveModel, Column};
use crate::entity::{parents, students, teachers};
use crate::errors::{PortalError, Result};
use crate::models::{
    auth::entities::IdentityProfile,
    users::entities::{User, UserRole, pending_external_id},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, warn};

impl SeaOrmStorage {
    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过身份提供方 ID 获取用户
    pub async fn get_user_by_external_id_impl(&self, external_id: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 同步身份提供方用户
    pub async fn sync_identity_user_impl(&self, profile: IdentityProfile) -> Result<User> {
        if let Some(user) = self
            .get_user_by_external_id_impl(&profile.external_id)
            .await?
        {
            return Ok(user);
        }

        let email = profile.email_or_placeholder();
        let existing = Users::find()
            .filter(Column::Email.eq(&email))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询用户失败"))?;

        // 按邮箱关联管理员预建的账号
        if let Some(model) = existing {
            let pending = model.external_id.starts_with(
                crate::models::users::entities::PENDING_EXTERNAL_ID_PREFIX,
            );
            if !pending {
                warn!(
                    "Relinking user {} from identity {} to {}",
                    model.id, model.external_id, profile.external_id
                );
            }

            let mut active: ActiveModel = model.into();
            active.external_id = Set(profile.external_id.clone());
            active.updated_at = Set(chrono::Utc::now().timestamp());
            let updated = active
                .update(&self.db)
                .await
                .map_err(|e| map_write_error(e, "关联身份账号失败"))?;

            info!("Linked identity {} to user {}", profile.external_id, updated.id);
            return Ok(updated.into_user());
        }

        match self.create_self_registered_student(&profile, &email).await {
            Ok(user) => Ok(user),
            // 并发的首次请求已经创建了该账号
            Err(PortalError::Conflict(_)) => self
                .get_user_by_external_id_impl(&profile.external_id)
                .await?
                .ok_or_else(|| PortalError::conflict("Identity is already linked to another account")),
            Err(e) => Err(e),
        }
    }

    /// 首次登录且无预建账号时自动创建学生
    async fn create_self_registered_student(
        &self,
        profile: &IdentityProfile,
        email: &str,
    ) -> Result<User> {
        let now = chrono::Utc::now();
        let full_name = profile.full_name_or_default();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::database_operation(format!("开启事务失败: {e}")))?;

        let user = insert_user(
            &txn,
            profile.external_id.clone(),
            email.to_string(),
            full_name.clone(),
            UserRole::Student,
        )
        .await?;

        students::ActiveModel {
            user_id: Set(Some(user.id)),
            full_name: Set(full_name),
            admission_no: Set(format!("AUTO-{}", now.timestamp_millis())),
            roll_number: Set(None),
            class_id: Set(None),
            parent_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_error(e, "创建学生档案失败"))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Auto-created student user {} for identity {}",
            user.id, profile.external_id
        );
        Ok(user.into_user())
    }

    /// 创建待关联账号
    pub async fn create_pending_user_impl(
        &self,
        email: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User> {
        let model = insert_user(
            &self.db,
            pending_external_id(),
            email.trim().to_string(),
            full_name.to_string(),
            role,
        )
        .await?;
        Ok(model.into_user())
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询用户总数失败"))
    }

    /// 用户对应角色档案的 ID，管理员没有档案
    pub async fn get_profile_id_impl(&self, user: &User) -> Result<Option<i64>> {
        let id = match user.role {
            UserRole::Admin => None,
            UserRole::Teacher => Teachers::find()
                .filter(teachers::Column::UserId.eq(user.id))
                .one(&self.db)
                .await
                .map_err(|e| map_read_error(e, "查询教师档案失败"))?
                .map(|m| m.id),
            UserRole::Student => Students::find()
                .filter(students::Column::UserId.eq(user.id))
                .one(&self.db)
                .await
                .map_err(|e| map_read_error(e, "查询学生档案失败"))?
                .map(|m| m.id),
            UserRole::Parent => Parents::find()
                .filter(parents::Column::UserId.eq(user.id))
                .one(&self.db)
                .await
                .map_err(|e| map_read_error(e, "查询家长档案失败"))?
                .map(|m| m.id),
        };
        Ok(id)
    }
}

/// 插入用户行，可在事务内使用
pub(super) async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    external_id: String,
    email: String,
    full_name: String,
    role: UserRole,
) -> Result<UserModel> {
    let now = chrono::Utc::now().timestamp();
    ActiveModel {
        external_id: Set(external_id),
        email: Set(email),
        full_name: Set(full_name),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_write_error(e, "创建用户失败"))
}

/// 按邮箱查找用户
pub(super) async fn find_user_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<UserModel>> {
    Users::find()
        .filter(Column::Email.eq(email.trim()))
        .one(conn)
        .await
        .map_err(|e| map_read_error(e, "查询用户失败"))
}

/// 更新档案关联账号的姓名与邮箱，邮箱被其他账号占用时返回 Conflict
pub(super) async fn update_linked_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Option<i64>,
    full_name: &str,
    email: &str,
) -> Result<Option<UserModel>> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };
    let Some(model) = Users::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(|e| map_read_error(e, "查询用户失败"))?
    else {
        return Ok(None);
    };

    let email = email.trim();
    if model.email != email
        && let Some(other) = find_user_by_email(conn, email).await?
        && other.id != model.id
    {
        return Err(PortalError::conflict("Email is already in use"));
    }

    let mut active: ActiveModel = model.into();
    active.full_name = Set(full_name.to_string());
    active.email = Set(email.to_string());
    active.updated_at = Set(chrono::Utc::now().timestamp());
    let updated = active
        .update(conn)
        .await
        .map_err(|e| map_write_error(e, "更新用户失败"))?;
    Ok(Some(updated))
}

/// 删除档案：有关联账号时删除账号（级联删除档案）
pub(super) async fn delete_user_row<C: ConnectionTrait>(conn: &C, user_id: i64) -> Result<bool> {
    let result = Users::delete_by_id(user_id)
        .exec(conn)
        .await
        .map_err(|e| map_write_error(e, "删除用户失败"))?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sub: &str, email: Option<&str>, name: Option<&str>) -> IdentityProfile {
        IdentityProfile {
            external_id: sub.to_string(),
            email: email.map(str::to_string),
            full_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_sync_links_pending_user_by_email() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let pending = storage
            .create_pending_user_impl("head@school.test", "Head Teacher", UserRole::Admin)
            .await
            .unwrap();
        assert!(pending.is_pending());

        let user = storage
            .sync_identity_user_impl(profile("idp_admin", Some("head@school.test"), None))
            .await
            .unwrap();
        assert_eq!(user.id, pending.id);
        assert_eq!(user.external_id, "idp_admin");
        assert_eq!(user.role, UserRole::Admin);

        // 再次同步命中 external_id
        let again = storage
            .sync_identity_user_impl(profile("idp_admin", Some("other@school.test"), None))
            .await
            .unwrap();
        assert_eq!(again.id, pending.id);
    }

    #[tokio::test]
    async fn test_sync_auto_creates_student() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .sync_identity_user_impl(profile("idp_new", None, None))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.email, "idp_new@placeholder.local");
        assert_eq!(user.full_name, "New Student");

        let student = storage
            .get_student_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(student.admission_no.starts_with("AUTO-"));
        assert_eq!(student.class_id, None);
        assert_eq!(
            storage.get_profile_id_impl(&user).await.unwrap(),
            Some(student.id)
        );
    }

    #[tokio::test]
    async fn test_duplicate_pending_email_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_pending_user_impl("dup@school.test", "First", UserRole::Parent)
            .await
            .unwrap();
        let err = storage
            .create_pending_user_impl("dup@school.test", "Second", UserRole::Parent)
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }
}
