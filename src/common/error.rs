use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed response envelope from {supplier}: {message}")]
    MalformedEnvelope { supplier: String, message: String },

    #[error("Fetch from {supplier} timed out after {elapsed_ms}ms")]
    Timeout { supplier: String, elapsed_ms: u128 },

    #[error("Supplier {supplier} failed: {reason}")]
    SupplierFetch { supplier: String, reason: String },

    #[error("All {attempted} supplier(s) failed, no data to merge")]
    TotalFetchFailure { attempted: usize },

    #[error("Invalid filter input: {0}")]
    InvalidFilterInput(String),
}

impl MergerError {
    /// Wraps any fetch-side failure as a per-supplier error.
    pub fn supplier(supplier: &str, err: impl std::fmt::Display) -> Self {
        MergerError::SupplierFetch {
            supplier: supplier.to_string(),
            reason: err.to_string(),
        }
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MergerError::Http(_) => "http",
            MergerError::Json(_) => "json",
            MergerError::Toml(_) => "toml",
            MergerError::Io(_) => "io",
            MergerError::Config(_) => "config",
            MergerError::MalformedEnvelope { .. } => "malformed_envelope",
            MergerError::Timeout { .. } => "timeout",
            MergerError::SupplierFetch { .. } => "supplier_fetch",
            MergerError::TotalFetchFailure { .. } => "total_fetch_failure",
            MergerError::InvalidFilterInput(_) => "invalid_filter_input",
        }
    }
}

pub type Result<T> = std::result::Result<T, MergerError>;
