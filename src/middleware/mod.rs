//! Request extractors guarding authenticated routes.

pub mod auth;
pub mod rbac;
