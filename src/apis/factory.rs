use std::sync::Arc;

use crate::apis::base::HttpSupplier;
use crate::common::error::Result;
use crate::common::types::SupplierSource;
use crate::config::{MergerConfig, SupplierConfig};

/// Build the source for one configured supplier
pub fn create_supplier(config: &SupplierConfig, fetch_timeout: std::time::Duration) -> Result<Arc<dyn SupplierSource>> {
    let supplier = HttpSupplier::new(&config.name, config.schema, &config.endpoint, fetch_timeout)?;
    Ok(Arc::new(supplier))
}

/// Sources for every enabled supplier, in configuration order
pub fn create_suppliers(config: &MergerConfig) -> Result<Vec<Arc<dyn SupplierSource>>> {
    config
        .enabled_suppliers()
        .map(|supplier| create_supplier(supplier, config.fetch_timeout()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SupplierSchema;

    #[test]
    fn test_create_suppliers_skips_disabled() {
        let mut config = MergerConfig::default();
        config.suppliers[1].enabled = false;

        let sources = create_suppliers(&config).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.supplier_name()).collect();
        assert_eq!(names, vec!["acme", "patagonia"]);
        assert_eq!(sources[1].schema(), SupplierSchema::Patagonia);
    }
}
