use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户与身份同步
    // 通过ID获取用户
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 将身份提供方用户同步为本地账号（查找、按邮箱关联或自动创建学生）
    async fn sync_identity_user(&self, profile: IdentityProfile) -> Result<User>;
    // 创建待关联账号
    async fn create_pending_user(
        &self,
        email: &str,
        full_name: &str,
        role: UserRole,
    ) -> Result<User>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 用户对应角色档案的 ID
    async fn get_profile_id(&self, user: &User) -> Result<Option<i64>>;

    /// 教师管理
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn list_all_teachers(&self) -> Result<Vec<Teacher>>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<TeacherDetail>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<TeacherDetail>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<TeacherDetail>>;
    // 删除教师：有账号时删除账号（级联删除档案），否则只删档案
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    async fn count_teachers(&self) -> Result<u64>;

    /// 学生管理
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn create_student(&self, req: CreateStudentRequest) -> Result<StudentDetail>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self) -> Result<u64>;
    // 班级学生，按姓名排序
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;

    /// 家长管理
    async fn list_parents_with_pagination(
        &self,
        query: ParentListQuery,
    ) -> Result<ParentListResponse>;
    async fn get_parent_by_id(&self, id: i64) -> Result<Option<ParentDetail>>;
    async fn get_parent_by_user_id(&self, user_id: i64) -> Result<Option<Parent>>;
    async fn create_parent(&self, req: CreateParentRequest) -> Result<ParentDetail>;
    async fn update_parent(
        &self,
        id: i64,
        update: UpdateParentRequest,
    ) -> Result<Option<ParentDetail>>;
    async fn delete_parent(&self, id: i64) -> Result<bool>;
    async fn list_children_of_parent(&self, parent_id: i64) -> Result<Vec<ChildSummary>>;
    // 家长是否有孩子在该班级
    async fn parent_has_child_in_class(&self, parent_id: i64, class_id: i64) -> Result<bool>;

    /// 班级管理
    async fn list_classes(&self) -> Result<Vec<ClassSummary>>;
    async fn list_class_options(&self) -> Result<Vec<Class>>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    // 批量更新座号，只处理属于该班级的学生
    async fn update_roll_numbers(&self, class_id: i64, entries: Vec<RollNumberEntry>)
    -> Result<u64>;
    // 删除班级及其课程表、科目、相关成绩，学生取消分班，单个事务内完成
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    async fn count_classes(&self) -> Result<u64>;
    // 教师有课的班级
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<TeacherClass>>;
    async fn teacher_teaches_class(&self, teacher_id: i64, class_id: i64) -> Result<bool>;

    /// 科目管理
    async fn list_subjects(&self) -> Result<Vec<SubjectWithClass>>;
    async fn list_subjects_by_class(&self, class_id: i64) -> Result<Vec<Subject>>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 课程表
    async fn list_class_routine_counts(&self) -> Result<Vec<ClassRoutineCount>>;
    async fn list_routines_by_class(&self, class_id: i64) -> Result<Vec<RoutineDetail>>;
    // 教师课程，可按星期过滤，按开始时间排序
    async fn list_routines_by_teacher(
        &self,
        teacher_id: i64,
        day: Option<DayOfWeek>,
    ) -> Result<Vec<RoutineDetail>>;
    async fn create_routine(&self, routine: NewRoutine) -> Result<Routine>;
    // 删除课程，返回被删除的条目
    async fn delete_routine(&self, id: i64) -> Result<Option<Routine>>;

    /// 考勤
    async fn list_attendance_for_class(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    // 按 (student_id, date) 更新或新建，忽略不在该班级的学生
    async fn mark_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        records: HashMap<i64, AttendanceStatus>,
    ) -> Result<MarkAttendanceResponse>;
    // 学生考勤记录，按日期倒序
    async fn list_attendance_by_student(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<AttendanceRecord>>;
    async fn attendance_totals_on(&self, date: NaiveDate) -> Result<DailyAttendanceTotals>;

    /// 考试
    async fn list_exams(&self) -> Result<Vec<ExamSummary>>;
    async fn list_exam_options(&self) -> Result<Vec<Exam>>;
    async fn get_exam_by_id(&self, id: i64) -> Result<Option<Exam>>;
    async fn create_exam(&self, exam: NewExam) -> Result<Exam>;
    async fn delete_exam(&self, id: i64) -> Result<bool>;

    /// 成绩
    // 按 (student_id, exam_id, subject_id) 更新或新建，单个事务内完成
    async fn upsert_marks(
        &self,
        exam_id: i64,
        subject_id: i64,
        class_id: i64,
        entries: Vec<MarkEntry>,
    ) -> Result<MarksUpdateResponse>;
    async fn list_marks_by_exam_subject(&self, exam_id: i64, subject_id: i64)
    -> Result<Vec<Mark>>;
    // 学生成绩，按考试倒序
    async fn list_marks_by_student(
        &self,
        student_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<MarkDetail>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
