//! Shared types, errors, and configuration for Karat.
//!
//! This crate provides common types used across all other crates:
//! - Money and gold-weight rounding with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Caller identity and role capabilities
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod identity;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use identity::{Caller, Role};
