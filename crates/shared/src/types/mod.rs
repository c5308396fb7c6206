//! Common types used across the application.

pub mod id;
pub mod measures;
pub mod pagination;

pub use id::*;
pub use measures::{Purity, round_money, round_weight};
pub use pagination::{PageRequest, Paginated, Pagination};
