//! Shared types, errors, and configuration for Feriado.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - The public-holiday provider client
//! - The notification email service

pub mod config;
pub mod email;
pub mod error;
pub mod holidays;
pub mod types;

pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use holidays::{HolidayError, HolidayService};
