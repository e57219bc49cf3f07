/// Supplier name constants to ensure consistency across the codebase

// Supplier tags (used in config, logs and provenance)
pub const ACME_SUPPLIER: &str = "acme";
pub const PAPERFLIES_SUPPLIER: &str = "paperflies";
pub const PATAGONIA_SUPPLIER: &str = "patagonia";

// Default endpoints for the known suppliers
pub const ACME_ENDPOINT: &str = "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/acme";
pub const PAPERFLIES_ENDPOINT: &str =
    "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/paperflies";
pub const PATAGONIA_ENDPOINT: &str =
    "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/patagonia";

// Timeouts
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 30;

// Config
pub const DEFAULT_CONFIG_PATH: &str = "hotel_merger.toml";
pub const FETCH_TIMEOUT_ENV: &str = "HOTEL_MERGER_FETCH_TIMEOUT_SECS";
pub const RUN_TIMEOUT_ENV: &str = "HOTEL_MERGER_RUN_TIMEOUT_SECS";

/// Argument value meaning "do not filter on this dimension"
pub const NO_FILTER_TOKEN: &str = "none";

/// Get all supported supplier tags
pub fn get_supported_suppliers() -> Vec<&'static str> {
    vec![ACME_SUPPLIER, PAPERFLIES_SUPPLIER, PATAGONIA_SUPPLIER]
}
