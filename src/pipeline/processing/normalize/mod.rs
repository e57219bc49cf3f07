//! Record normalizer: raw supplier payload to [`NormalizedHotelRecord`].

pub mod normalizers;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{NormalizedHotelRecord, RawHotelRecord, SupplierSchema};
use crate::observability::metrics;
use normalizers::{AcmeNormalizer, PaperfliesNormalizer, PatagoniaNormalizer, SourceNormalizer};

impl SupplierSchema {
    /// Dispatch to the one extraction rule for this schema.
    pub fn normalize(&self, source: &str, payload: &Value) -> Option<NormalizedHotelRecord> {
        match self {
            SupplierSchema::Acme => AcmeNormalizer.normalize(source, payload),
            SupplierSchema::Paperflies => PaperfliesNormalizer.normalize(source, payload),
            SupplierSchema::Patagonia => PatagoniaNormalizer.normalize(source, payload),
        }
    }
}

/// Normalize one raw record. `None` means the record was dropped because it
/// has no resolvable `(hotel_id, destination_id)`.
pub fn normalize(raw: &RawHotelRecord) -> Option<NormalizedHotelRecord> {
    let normalized = raw.schema.normalize(&raw.supplier, &raw.payload);
    match &normalized {
        Some(_) => metrics::normalize::record_normalized(&raw.supplier),
        None => {
            debug!(supplier = %raw.supplier, schema = %raw.schema, "Dropping record without a resolvable identity key");
            metrics::normalize::record_dropped(&raw.supplier);
        }
    }
    normalized
}

/// Records kept and the number dropped, in input order
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub records: Vec<NormalizedHotelRecord>,
    pub dropped: usize,
}

#[instrument(skip(raws), fields(raw_count = raws.len()))]
pub fn normalize_all(raws: &[RawHotelRecord]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    for raw in raws {
        match normalize(raw) {
            Some(record) => outcome.records.push(record),
            None => outcome.dropped += 1,
        }
    }
    debug!(kept = outcome.records.len(), dropped = outcome.dropped, "Normalization finished");
    outcome
}
