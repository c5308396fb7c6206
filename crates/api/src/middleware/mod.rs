//! Request middleware.

pub mod identity;

pub use identity::{CallerIdentity, identity_middleware};
