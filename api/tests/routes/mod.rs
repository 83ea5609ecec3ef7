mod health_test;
mod login_test;
mod scan_test;
mod session_test;
