// Common utilities and shared types used across the application

pub mod constants;
pub mod error;
pub mod types;

pub use error::{MergerError, Result};
pub use types::SupplierSource;
