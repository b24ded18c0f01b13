//! Business logic services.

pub mod activity;
pub mod analytics;
pub mod auth;
