// Supplier sources: one HTTP implementation, built per configured supplier
pub mod base;
pub mod factory;

pub use base::HttpSupplier;
pub use factory::{create_supplier, create_suppliers};
