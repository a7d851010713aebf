pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod exams;
pub mod marks;
pub mod parents;
pub mod schedule;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use common::*;

/// 业务错误码，随响应体的 `code` 字段返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 身份认证
    AuthFailed = 2000,
    IdentitySyncFailed = 2001,
    ProfileNotFound = 2002,

    // 人员档案
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserEmailAlreadyExists = 3003,
    TeacherNotFound = 3100,
    StudentNotFound = 3200,
    StudentAdmissionInvalid = 3201,
    StudentAdmissionAlreadyExists = 3202,
    ParentNotFound = 3300,
    ParentPhoneInvalid = 3301,

    // 班级与科目
    ClassNotFound = 4000,
    ClassNameInvalid = 4001,
    ClassPermissionDenied = 4003,
    ClassDeleteFailed = 4004,
    SubjectNotFound = 4100,
    SubjectInvalid = 4101,

    // 课程表
    RoutineNotFound = 5000,
    RoutineInvalid = 5001,

    // 考勤
    AttendanceInvalid = 6000,

    // 考试与成绩
    ExamNotFound = 7000,
    ExamInvalid = 7001,
    MarksInvalid = 7100,
}
