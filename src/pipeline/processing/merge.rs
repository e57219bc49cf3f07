//! Merge engine: one canonical hotel per bucket.
//!
//! Field policy, applied independently per field:
//!
//! * name, description, address sub-fields: longest non-empty value, ties go
//!   to the earliest record in bucket order
//! * coordinates: first record that has them
//! * amenities: union, deduped on the lowercase form
//! * images: per category concatenation, deduped by URL, first kept
//! * booking conditions: concatenation, deduped, first kept
//!
//! The policy is total: every non-empty bucket merges without error.

use std::collections::{BTreeMap, HashSet};
use tracing::trace;

use crate::domain::{Address, HotelCatalog, HotelField, ImageCategory, Images, MergedHotel, NormalizedHotelRecord};
use crate::observability::metrics;
use crate::pipeline::processing::grouping::Bucket;

/// A chosen value and the supplier it came from
struct Pick<'a> {
    value: &'a str,
    source: &'a str,
}

/// Longest non-empty value by character count. Only a strictly longer value
/// replaces the current pick, so the earliest record wins a tie.
fn pick_longest<'a, F>(bucket: &'a [NormalizedHotelRecord], field: F) -> Option<Pick<'a>>
where
    F: Fn(&'a NormalizedHotelRecord) -> Option<&'a String>,
{
    let mut best: Option<(usize, Pick<'a>)> = None;
    for record in bucket {
        let Some(value) = field(record).filter(|v| !v.is_empty()) else {
            continue;
        };
        let length = value.chars().count();
        if best.as_ref().map_or(true, |(best_len, _)| length > *best_len) {
            best = Some((length, Pick { value, source: &record.source }));
        }
    }
    best.map(|(_, pick)| pick)
}

fn dedupe_concat<T, K, F>(lists: impl Iterator<Item = T>, key: F) -> Vec<T>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    lists.filter(|item| seen.insert(key(item))).collect()
}

/// Merge one bucket. `None` only for an empty slice, which grouping never
/// produces.
pub fn merge(bucket: &[NormalizedHotelRecord]) -> Option<MergedHotel> {
    let first = bucket.first()?;
    let mut provenance = BTreeMap::new();

    let mut take = |field: HotelField, pick: Option<Pick<'_>>| -> Option<String> {
        pick.map(|p| {
            provenance.insert(field, p.source.to_string());
            p.value.to_string()
        })
    };

    let name = take(HotelField::Name, pick_longest(bucket, |r| r.name.as_ref()));
    let description = take(HotelField::Description, pick_longest(bucket, |r| r.description.as_ref()));
    let address = Address {
        line: take(HotelField::AddressLine, pick_longest(bucket, |r| r.address.line.as_ref())),
        city: take(HotelField::City, pick_longest(bucket, |r| r.address.city.as_ref())),
        country: take(HotelField::Country, pick_longest(bucket, |r| r.address.country.as_ref())),
        postal_code: take(HotelField::PostalCode, pick_longest(bucket, |r| r.address.postal_code.as_ref())),
    };

    let coordinates = bucket.iter().find_map(|r| r.coordinates.map(|c| (c, &r.source)));
    if let Some((_, source)) = coordinates {
        provenance.insert(HotelField::Coordinates, source.clone());
    }

    let amenities = dedupe_concat(
        bucket.iter().flat_map(|r| r.amenities.iter().cloned()),
        |a: &String| a.to_lowercase(),
    );

    let mut images = Images::default();
    for category in ImageCategory::ALL {
        *images.category_mut(category) = dedupe_concat(
            bucket.iter().flat_map(|r| r.images.category(category).iter().cloned()),
            |img| img.url.clone(),
        );
    }

    let booking_conditions = dedupe_concat(
        bucket.iter().flat_map(|r| r.booking_conditions.iter().cloned()),
        |c: &String| c.clone(),
    );

    let sources = dedupe_concat(bucket.iter().map(|r| r.source.clone()), |s: &String| s.clone());

    trace!(hotel_id = %first.hotel_id, members = bucket.len(), "Merged bucket");

    Some(MergedHotel {
        hotel_id: first.hotel_id.clone(),
        destination_id: first.destination_id.clone(),
        name,
        address,
        coordinates: coordinates.map(|(c, _)| c),
        description,
        amenities,
        images,
        booking_conditions,
        sources,
        provenance,
    })
}

/// Merge every bucket, keeping bucket order.
pub fn merge_buckets(buckets: &[Bucket]) -> HotelCatalog {
    buckets
        .iter()
        .filter_map(|bucket| {
            metrics::merge::bucket_merged(bucket.records.len());
            merge(&bucket.records)
        })
        .collect()
}
