use crate::common::error::Result;
use crate::domain::{RawHotelRecord, SupplierSchema};

/// Core trait that all supplier data sources must implement
#[async_trait::async_trait]
pub trait SupplierSource: Send + Sync {
    /// Unique tag for this supplier, used in provenance and logs
    fn supplier_name(&self) -> &str;

    /// Schema the returned payloads follow
    fn schema(&self) -> SupplierSchema;

    /// Fetch every hotel this supplier knows about
    async fn fetch(&self) -> Result<Vec<RawHotelRecord>>;
}
