pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod exams;
pub mod marks;
pub mod parents;
pub mod schedule;
pub mod students;
pub mod subjects;
pub mod teachers;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use exams::configure_exams_routes;
pub use marks::configure_marks_routes;
pub use parents::configure_parents_routes;
pub use schedule::configure_schedule_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use teachers::configure_teachers_routes;
