pub mod attendance_record;
pub mod student;
pub mod timetable_entry;

pub use attendance_record::Entity as AttendanceRecord;
pub use student::Entity as Student;
pub use timetable_entry::Entity as TimetableEntry;
