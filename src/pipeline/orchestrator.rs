use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Instant as StdInstant;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use crate::common::{MergerError, Result, SupplierSource};
use crate::config::MergerConfig;
use crate::domain::{HotelCatalog, MergedHotel, RawHotelRecord};
use crate::observability::metrics;
use crate::pipeline::processing::filter::{self, HotelFilter};
use crate::pipeline::processing::{grouping, merge, normalize};

/// Outcome of one supplier's fetch
#[derive(Debug, Clone, Serialize)]
pub struct SupplierReport {
    pub supplier: String,
    pub records_fetched: usize,
    pub error: Option<String>,
}

impl SupplierReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// One entry per configured source, in configuration order
    pub suppliers: Vec<SupplierReport>,
    pub records_normalized: usize,
    pub records_dropped: usize,
    pub buckets: usize,
    pub hotels_emitted: usize,
    pub fingerprint: String,
    pub duration_ms: u128,
}

impl RunReport {
    pub fn failed_suppliers(&self) -> impl Iterator<Item = &SupplierReport> {
        self.suppliers.iter().filter(|s| !s.succeeded())
    }
}

pub struct HotelPipeline {
    config: MergerConfig,
    sources: Vec<Arc<dyn SupplierSource>>,
}

impl HotelPipeline {
    pub fn new(config: MergerConfig, sources: Vec<Arc<dyn SupplierSource>>) -> Self {
        Self { config, sources }
    }

    /// Fetch, normalize, group, merge, and filter. Fails only when no
    /// supplier delivered.
    pub async fn run(&self, filter: &HotelFilter) -> Result<HotelCatalog> {
        self.run_with_report(filter).await.map(|(catalog, _)| catalog)
    }

    #[instrument(skip(self, filter), fields(sources = self.sources.len()))]
    pub async fn run_with_report(&self, filter: &HotelFilter) -> Result<(HotelCatalog, RunReport)> {
        let started = StdInstant::now();
        info!("🚀 Starting hotel merge across {} supplier(s)", self.sources.len());

        let (raws, suppliers) = self.fetch_all().await;
        let delivered = suppliers.iter().filter(|s| s.succeeded()).count();
        if delivered == 0 {
            warn!(attempted = self.sources.len(), "No supplier delivered any data");
            return Err(MergerError::TotalFetchFailure { attempted: self.sources.len() });
        }

        let normalized = normalize::normalize_all(&raws);
        let records_normalized = normalized.records.len();
        let buckets = grouping::group(normalized.records);
        let bucket_count = buckets.len();
        let merged = merge::merge_buckets(&buckets);
        let catalog = filter::filter(merged, filter);

        let fingerprint = catalog_fingerprint(&catalog)?;
        let report = RunReport {
            suppliers,
            records_normalized,
            records_dropped: normalized.dropped,
            buckets: bucket_count,
            hotels_emitted: catalog.len(),
            fingerprint,
            duration_ms: started.elapsed().as_millis(),
        };

        info!(
            hotels = report.hotels_emitted,
            buckets = report.buckets,
            dropped = report.records_dropped,
            fingerprint = %report.fingerprint,
            "✅ Merge finished in {}ms",
            report.duration_ms
        );
        Ok((catalog, report))
    }

    /// One task per source. Handles are awaited in configuration order, so
    /// the concatenated records are deterministic regardless of which
    /// supplier answers first.
    async fn fetch_all(&self) -> (Vec<RawHotelRecord>, Vec<SupplierReport>) {
        let run_deadline = Instant::now() + self.config.run_timeout();
        let fetch_timeout = self.config.fetch_timeout();

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let deadline = (Instant::now() + fetch_timeout).min(run_deadline);
                let name = source.supplier_name().to_string();
                (name, tokio::spawn(fetch_with_deadline(source, deadline)))
            })
            .collect();

        let mut raws = Vec::new();
        let mut reports = Vec::with_capacity(handles.len());
        for (supplier, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(MergerError::supplier(&supplier, format!("fetch task aborted: {join_error}"))),
            };
            match outcome {
                Ok(records) => {
                    reports.push(SupplierReport { supplier, records_fetched: records.len(), error: None });
                    raws.extend(records);
                }
                Err(e) => {
                    warn!(supplier = %supplier, error_kind = e.kind(), "Supplier failed, continuing without it: {}", e);
                    metrics::sources::fetch_error(&supplier, e.kind());
                    reports.push(SupplierReport { supplier, records_fetched: 0, error: Some(e.to_string()) });
                }
            }
        }
        (raws, reports)
    }
}

#[instrument(skip(source, deadline), fields(supplier = %source.supplier_name()))]
async fn fetch_with_deadline(source: Arc<dyn SupplierSource>, deadline: Instant) -> Result<Vec<RawHotelRecord>> {
    let supplier = source.supplier_name().to_string();
    let started = StdInstant::now();

    let result = match timeout_at(deadline, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(MergerError::Timeout { supplier: supplier.clone(), elapsed_ms: started.elapsed().as_millis() }),
    };

    metrics::sources::fetch_duration(&supplier, started.elapsed().as_secs_f64());
    if let Ok(records) = &result {
        debug!("Fetched {} raw record(s)", records.len());
        metrics::sources::fetch_success(&supplier);
        metrics::sources::records_fetched(&supplier, records.len());
    }
    result
}

/// SHA-256 hex digest of the compact JSON serialization of the catalog.
/// Equal catalogs give equal fingerprints across runs.
pub fn catalog_fingerprint(catalog: &[MergedHotel]) -> Result<String> {
    let bytes = serde_json::to_vec(catalog)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Images};
    use std::collections::BTreeMap;

    fn hotel(name: &str) -> MergedHotel {
        MergedHotel {
            hotel_id: "h1".into(),
            destination_id: "d1".into(),
            name: Some(name.into()),
            address: Address::default(),
            coordinates: None,
            description: None,
            amenities: vec!["wifi".into()],
            images: Images::default(),
            booking_conditions: Vec::new(),
            sources: vec!["acme".into()],
            provenance: BTreeMap::new(),
        }
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = catalog_fingerprint(&[hotel("Grand Hotel")]).unwrap();
        let b = catalog_fingerprint(&[hotel("Grand Hotel")]).unwrap();
        let c = catalog_fingerprint(&[hotel("Grand Hotel & Spa")]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_ignores_internal_provenance() {
        let mut with_sources = hotel("Grand Hotel");
        with_sources.sources.push("patagonia".into());
        assert_eq!(
            catalog_fingerprint(&[hotel("Grand Hotel")]).unwrap(),
            catalog_fingerprint(&[with_sources]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_no_sources_is_total_failure() {
        let pipeline = HotelPipeline::new(MergerConfig::default(), Vec::new());
        let err = pipeline.run(&HotelFilter::default()).await.unwrap_err();
        assert!(matches!(err, MergerError::TotalFetchFailure { attempted: 0 }));
    }
}
