//! Request middleware.

pub mod auth;

pub use auth::{AuthEmployee, identity_middleware};
