//! Metrics for the hotel merger
//!
//! Recording goes through the `metrics` facade, so every call is a no-op
//! until a recorder is installed with [`init`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Supplier fetch metrics
    SourcesFetchSuccess,
    SourcesFetchError,
    SourcesFetchDuration,
    SourcesRecordsFetched,

    // Normalize metrics
    NormalizeRecordsProcessed,
    NormalizeRecordsDropped,

    // Merge metrics
    MergeBucketsMerged,
    MergeBucketSize,

    // Filter metrics
    FilterHotelsEmitted,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::SourcesFetchSuccess => "hotel_merger_sources_fetch_success_total",
            MetricName::SourcesFetchError => "hotel_merger_sources_fetch_error_total",
            MetricName::SourcesFetchDuration => "hotel_merger_sources_fetch_duration_seconds",
            MetricName::SourcesRecordsFetched => "hotel_merger_sources_records_fetched_total",
            MetricName::NormalizeRecordsProcessed => "hotel_merger_normalize_records_processed_total",
            MetricName::NormalizeRecordsDropped => "hotel_merger_normalize_records_dropped_total",
            MetricName::MergeBucketsMerged => "hotel_merger_merge_buckets_merged_total",
            MetricName::MergeBucketSize => "hotel_merger_merge_bucket_size",
            MetricName::FilterHotelsEmitted => "hotel_merger_filter_hotels_emitted_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder. The handle renders the exposition text.
pub fn init() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;
    Ok(handle)
}

pub mod sources {
    use super::MetricName;

    pub fn fetch_success(supplier: &str) {
        ::metrics::counter!(MetricName::SourcesFetchSuccess.as_str(), "supplier" => supplier.to_string()).increment(1);
    }

    pub fn fetch_error(supplier: &str, error_kind: &'static str) {
        ::metrics::counter!(
            MetricName::SourcesFetchError.as_str(),
            "supplier" => supplier.to_string(),
            "error_type" => error_kind
        )
        .increment(1);
    }

    pub fn fetch_duration(supplier: &str, secs: f64) {
        ::metrics::histogram!(MetricName::SourcesFetchDuration.as_str(), "supplier" => supplier.to_string()).record(secs);
    }

    pub fn records_fetched(supplier: &str, count: usize) {
        ::metrics::counter!(MetricName::SourcesRecordsFetched.as_str(), "supplier" => supplier.to_string())
            .increment(count as u64);
    }
}

pub mod normalize {
    use super::MetricName;

    pub fn record_normalized(supplier: &str) {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str(), "supplier" => supplier.to_string()).increment(1);
    }

    pub fn record_dropped(supplier: &str) {
        ::metrics::counter!(MetricName::NormalizeRecordsDropped.as_str(), "supplier" => supplier.to_string()).increment(1);
    }
}

pub mod merge {
    use super::MetricName;

    pub fn bucket_merged(size: usize) {
        ::metrics::counter!(MetricName::MergeBucketsMerged.as_str()).increment(1);
        ::metrics::histogram!(MetricName::MergeBucketSize.as_str()).record(size as f64);
    }
}

pub mod filter {
    use super::MetricName;

    pub fn hotels_emitted(count: usize) {
        ::metrics::counter!(MetricName::FilterHotelsEmitted.as_str()).increment(count as u64);
    }
}
