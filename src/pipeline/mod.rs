// Hotel data pipeline: concurrent fetch, then synchronous processing stages

pub mod orchestrator;
pub mod processing;

pub use orchestrator::{catalog_fingerprint, HotelPipeline, RunReport, SupplierReport};
pub use processing::HotelFilter;
