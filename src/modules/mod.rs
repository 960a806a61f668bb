pub mod exercise;
pub mod response;
pub mod trophy;
pub mod user;
