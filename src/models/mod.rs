//! Rows and enums read from the platform's transactional store.

pub mod application;
pub mod session;
pub mod university;
pub mod user;
