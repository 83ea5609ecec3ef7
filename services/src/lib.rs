pub mod attendance;
pub mod code_rotator;
pub mod device_binding;
pub mod error;
pub mod fingerprint;
pub mod schedule;
pub mod session;

pub use error::AppError;
