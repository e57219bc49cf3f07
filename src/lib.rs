//! Supplier hotel data merger: fetch, normalize, group, merge, and filter.

pub mod apis;
pub mod common;
pub mod config;
pub mod domain;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use common::{MergerError, Result, SupplierSource};
pub use config::{MergerConfig, SupplierConfig};
pub use domain::{HotelCatalog, MergedHotel, NormalizedHotelRecord, RawHotelRecord, SupplierSchema};
pub use pipeline::{catalog_fingerprint, HotelFilter, HotelPipeline, RunReport};
