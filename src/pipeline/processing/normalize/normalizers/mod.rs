// Base trait and utilities for supplier-specific normalizers
pub mod base;

// Individual normalizer implementations
pub mod acme;
pub mod paperflies;
pub mod patagonia;

// Re-export the main components
pub use acme::AcmeNormalizer;
pub use base::{NormalizerUtils, SourceNormalizer, SupplierHotel};
pub use paperflies::PaperfliesNormalizer;
pub use patagonia::PatagoniaNormalizer;
