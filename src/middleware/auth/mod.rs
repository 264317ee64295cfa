pub mod access;
pub mod bearer;
pub mod require;
