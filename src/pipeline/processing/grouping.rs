//! Grouping engine: buckets normalized records by identity key.

use std::collections::HashMap;

use crate::domain::{IdentityKey, NormalizedHotelRecord};

/// Every record that shares one identity key, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: IdentityKey,
    pub records: Vec<NormalizedHotelRecord>,
}

/// Group records by `(hotel_id, destination_id)`.
///
/// Buckets come out in the order their key was first seen and keep their
/// records in arrival order; both orders feed the merge tie-breaks. Duplicate
/// entries from one supplier stay in the bucket. No bucket is ever empty.
pub fn group(records: Vec<NormalizedHotelRecord>) -> Vec<Bucket> {
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();

    for record in records {
        let key = record.identity_key();
        match index.get(&key) {
            Some(&position) => buckets[position].records.push(record),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Bucket { key, records: vec![record] });
            }
        }
    }

    buckets
}
