//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod classes;
mod exams;
mod marks;
mod parents;
mod schedule;
mod students;
mod subjects;
mod teachers;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化，开启外键约束）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 内存 SQLite，单连接保证所有查询落在同一个数据库上
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }
}

/// 写操作的数据库错误转换：唯一约束冲突为 Conflict，外键约束失败为 Validation
pub(crate) fn map_write_error(err: DbErr, context: &str) -> PortalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            PortalError::conflict(format!("{context}: record already exists"))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            PortalError::validation(format!("{context}: referenced record does not exist"))
        }
        _ => PortalError::database_operation(format!("{context}: {err}")),
    }
}

/// 读操作的数据库错误
pub(crate) fn map_read_error(err: DbErr, context: &str) -> PortalError {
    PortalError::database_operation(format!("{context}: {err}"))
}

// Storage trait 实现
use crate::models::{
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus, DailyAttendanceTotals},
        responses::MarkAttendanceResponse,
    },
    auth::entities::IdentityProfile,
    classes::{
        entities::{Class, ClassDetail, ClassSummary, TeacherClass},
        requests::{CreateClassRequest, RollNumberEntry, UpdateClassRequest},
    },
    exams::entities::{Exam, ExamSummary, NewExam},
    marks::{
        entities::{Mark, MarkDetail, MarkEntry},
        responses::MarksUpdateResponse,
    },
    parents::{
        entities::{ChildSummary, Parent, ParentDetail},
        requests::{CreateParentRequest, ParentListQuery, UpdateParentRequest},
        responses::ParentListResponse,
    },
    schedule::entities::{ClassRoutineCount, DayOfWeek, NewRoutine, Routine, RoutineDetail},
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::{Subject, SubjectWithClass},
        requests::CreateSubjectRequest,
    },
    teachers::{
        entities::{Teacher, TeacherDetail},
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn sync_identity_user(&self, profile: IdentityProfile) -> Result<User> {
        self.sync_identity_user_impl(profile).await
    }

    async fn create_pending_user(
        &self,
        email: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User> {
        self.create_pending_user_impl(email, full_name, role).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn get_profile_id(&self, user: &User) -> Result<Option<i64>> {
        self.get_profile_id_impl(user).await
    }

    // 教师模块
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn list_all_teachers(&self) -> Result<Vec<Teacher>> {
        self.list_all_teachers_impl().await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<TeacherDetail>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail> {
        self.create_teacher_impl(req).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn count_teachers(&self) -> Result<u64> {
        self.count_teachers_impl().await
    }

    // 学生模块
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn create_student(&self, req: CreateStudentRequest) -> Result<StudentDetail> {
        self.create_student_impl(req).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_students(&self) -> Result<u64> {
        self.count_students_impl().await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    // 家长模块
    async fn list_parents_with_pagination(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse> {
        self.list_parents_with_pagination_impl(query).await
    }

    async fn get_parent_by_id(&self, id: i64) -> Result<Option<ParentDetail>> {
        self.get_parent_by_id_impl(id).await
    }

    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<Parent>> {
        self.get_parent_by_user_id_impl(user_id).await
    }

    async fn create_parent(&self, req: CreateParentRequest) -> Result<ParentDetail> {
        self.create_parent_impl(req).await
    }

    async fn update_parent(
        &self,
        id: i64,
        update: UpdateParentRequest,
    ) -> Result<Option<ParentDetail>> {
        self.update_parent_impl(id, update).await
    }

    async fn delete_parent(&self, id: i64) -> Result<bool> {
        self.delete_parent_impl(id).await
    }

    async fn list_children_of_parent(&self, parent_id: i64) -> Result<Vec<ChildSummary>> {
        self.list_children_of_parent_impl(parent_id).await
    }

    async fn parent_has_child_in_class(&self, parent_id: i64, class_id: i64) -> Result<bool> {
        self.parent_has_child_in_class_impl(parent_id, class_id)
            .await
    }

    // 班级模块
    async fn list_classes(&self) -> Result<Vec<ClassSummary>> {
        self.list_classes_impl().await
    }

    async fn list_class_options(&self) -> Result<Vec<Class>> {
        self.list_class_options_impl().await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        self.get_class_detail_impl(class_id).await
    }

    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn update_roll_numbers(
        &self,
        class_id: i64,
        entries: Vec<RollNumberEntry>,
    ) -> Result<u64> {
        self.update_roll_numbers_impl(class_id, entries).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_classes(&self) -> Result<u64> {
        self.count_classes_impl().await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<TeacherClass>> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn teacher_teaches_class(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        self.teacher_teaches_class_impl(teacher_id, class_id).await
    }

    // 科目模块
    async fn list_subjects(&self) -> Result<Vec<SubjectWithClass>> {
        self.list_subjects_impl().await
    }

    async fn list_subjects_by_class(&self, class_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_by_class_impl(class_id).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 课程表模块
    async fn list_class_routine_counts(&self) -> Result<Vec<ClassRoutineCount>> {
        self.list_class_routine_counts_impl().await
    }

    async fn list_routines_by_class(&self, class_id: i64) -> Result<Vec<RoutineDetail>> {
        self.list_routines_by_class_impl(class_id).await
    }

    async fn list_routines_by_teacher(
        &self,
        teacher_id: i64,
        day: Option<DayOfWeek>,
    ) -> Result<Vec<RoutineDetail>> {
        self.list_routines_by_teacher_impl(teacher_id, day).await
    }

    async fn create_routine(&self, routine: NewRoutine) -> Result<Routine> {
        self.create_routine_impl(routine).await
    }

    async fn delete_routine(&self, id: i64) -> Result<Option<Routine>> {
        self.delete_routine_impl(id).await
    }

    // 考勤模块
    async fn list_attendance_for_class(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_for_class_impl(class_id, date).await
    }

    async fn mark_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        records: HashMap<i64, AttendanceStatus>,
    ) -> Result<MarkAttendanceResponse> {
        self.mark_attendance_impl(class_id, date, records).await
    }

    async fn list_attendance_by_student(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_student_impl(student_id, limit)
            .await
    }

    async fn attendance_totals_on(&self, date: NaiveDate) -> Result<DailyAttendanceTotals> {
        self.attendance_totals_on_impl(date).await
    }

    // 考试模块
    async fn list_exams(&self) -> Result<Vec<ExamSummary>> {
        self.list_exams_impl().await
    }

    async fn list_exam_options(&self) -> Result<Vec<Exam>> {
        self.list_exam_options_impl().await
    }

    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(id).await
    }

    async fn create_exam(&self, exam: NewExam) -> Result<Exam> {
        self.create_exam_impl(exam).await
    }

    async fn delete_exam(&self, id: i64) -> Result<bool> {
        self.delete_exam_impl(id).await
    }

    // 成绩模块
    async fn upsert_marks(
        &self,
        exam_id: i64,
        subject_id: i64,
        class_id: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<MarksUpdateResponse> {
        self.upsert_marks_impl(exam_id, subject_id, class_id, entries)
            .await
    }

    async fn list_marks_by_exam_subject(
        &self,
        exam_id: i64,
        subject_id: i64,
    ) -> Result<Vec<Mark>> {
        self.list_marks_by_exam_subject_impl(exam_id, subject_id)
            .await
    }

    async fn list_marks_by_student(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<MarkDetail>> {
        self.list_marks_by_student_impl(student_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("school.db").unwrap(),
            "sqlite://school.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/school").unwrap(),
            "postgres://u:p@localhost/school"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_storage_is_migrated() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);
        assert_eq!(storage.count_classes_impl().await.unwrap(), 0);
    }
}
