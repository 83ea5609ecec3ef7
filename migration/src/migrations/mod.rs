pub mod m202510010001_create_students;
pub mod m202510010002_create_timetable_entries;
pub mod m202510010003_create_attendance_records;
