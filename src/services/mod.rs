pub mod conversion;
pub mod exercise_log;
pub mod jwt;
pub mod trophy;
