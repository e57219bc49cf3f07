//! Query filter over the merged catalog.

use std::collections::BTreeSet;

use crate::common::constants::NO_FILTER_TOKEN;
use crate::common::{MergerError, Result};
use crate::domain::{HotelCatalog, MergedHotel};
use crate::observability::metrics;

/// Optional id sets. An absent or empty set does not filter its dimension;
/// when both are present a hotel must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelFilter {
    pub hotel_ids: Option<BTreeSet<String>>,
    pub destination_ids: Option<BTreeSet<String>>,
}

impl HotelFilter {
    pub fn new<H, D>(hotel_ids: Option<H>, destination_ids: Option<D>) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            hotel_ids: hotel_ids.map(|ids| ids.into_iter().map(Into::into).collect()),
            destination_ids: destination_ids.map(|ids| ids.into_iter().map(Into::into).collect()),
        }
    }

    /// Parse the two command-line arguments. Each is a comma-separated id
    /// list, or `none` (or an empty string) for no constraint.
    pub fn parse(hotel_ids: &str, destination_ids: &str) -> Result<Self> {
        Ok(Self {
            hotel_ids: parse_id_list("hotel_ids", hotel_ids)?,
            destination_ids: parse_id_list("destination_ids", destination_ids)?,
        })
    }

    pub fn is_unconstrained(&self) -> bool {
        is_open(&self.hotel_ids) && is_open(&self.destination_ids)
    }

    pub fn matches(&self, hotel: &MergedHotel) -> bool {
        admits(&self.hotel_ids, &hotel.hotel_id) && admits(&self.destination_ids, &hotel.destination_id)
    }
}

fn is_open(set: &Option<BTreeSet<String>>) -> bool {
    set.as_ref().map_or(true, BTreeSet::is_empty)
}

fn admits(set: &Option<BTreeSet<String>>, id: &str) -> bool {
    match set {
        Some(ids) if !ids.is_empty() => ids.contains(id),
        _ => true,
    }
}

fn parse_id_list(argument: &str, raw: &str) -> Result<Option<BTreeSet<String>>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_FILTER_TOKEN) {
        return Ok(None);
    }

    let mut ids = BTreeSet::new();
    for token in trimmed.split(',') {
        let id = token.trim();
        if id.is_empty() {
            return Err(MergerError::InvalidFilterInput(format!("{argument}: empty id in '{raw}'")));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(MergerError::InvalidFilterInput(format!("{argument}: id '{id}' contains whitespace")));
        }
        ids.insert(id.to_string());
    }
    Ok(Some(ids))
}

/// Keep matching hotels, preserving catalog order.
pub fn filter(catalog: HotelCatalog, filter: &HotelFilter) -> HotelCatalog {
    let emitted: HotelCatalog = if filter.is_unconstrained() {
        catalog
    } else {
        catalog.into_iter().filter(|hotel| filter.matches(hotel)).collect()
    };
    metrics::filter::hotels_emitted(emitted.len());
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Images};
    use std::collections::BTreeMap;

    fn hotel(hotel_id: &str, destination_id: &str) -> MergedHotel {
        MergedHotel {
            hotel_id: hotel_id.to_string(),
            destination_id: destination_id.to_string(),
            name: None,
            address: Address::default(),
            coordinates: None,
            description: None,
            amenities: Vec::new(),
            images: Images::default(),
            booking_conditions: Vec::new(),
            sources: Vec::new(),
            provenance: BTreeMap::new(),
        }
    }

    fn catalog() -> HotelCatalog {
        vec![hotel("iJhz", "5432"), hotel("SjyX", "5432"), hotel("f8c9", "1122")]
    }

    fn ids(catalog: &HotelCatalog) -> Vec<&str> {
        catalog.iter().map(|h| h.hotel_id.as_str()).collect()
    }

    #[test]
    fn test_parse_none_and_empty() {
        assert_eq!(HotelFilter::parse("none", "none").unwrap(), HotelFilter::default());
        assert_eq!(HotelFilter::parse("", " NONE ").unwrap(), HotelFilter::default());
    }

    #[test]
    fn test_parse_lists() {
        let filter = HotelFilter::parse("iJhz, SjyX", "none").unwrap();
        let expected: BTreeSet<String> = ["iJhz", "SjyX"].into_iter().map(String::from).collect();
        assert_eq!(filter.hotel_ids, Some(expected));
        assert!(filter.destination_ids.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for bad in ["a,,b", "a,", "iJ hz"] {
            let err = HotelFilter::parse(bad, "none").unwrap_err();
            assert!(matches!(err, MergerError::InvalidFilterInput(_)), "{bad} should be rejected");
        }
        assert!(HotelFilter::parse("none", "5432,").is_err());
    }

    #[test]
    fn test_no_constraint_returns_everything_in_order() {
        let out = filter(catalog(), &HotelFilter::default());
        assert_eq!(ids(&out), vec!["iJhz", "SjyX", "f8c9"]);
    }

    #[test]
    fn test_single_dimension() {
        let by_hotel = filter(catalog(), &HotelFilter::parse("f8c9,iJhz", "none").unwrap());
        assert_eq!(ids(&by_hotel), vec!["iJhz", "f8c9"]);

        let by_destination = filter(catalog(), &HotelFilter::parse("none", "5432").unwrap());
        assert_eq!(ids(&by_destination), vec!["iJhz", "SjyX"]);
    }

    #[test]
    fn test_both_dimensions_must_match() {
        let out = filter(catalog(), &HotelFilter::parse("iJhz,f8c9", "5432").unwrap());
        assert_eq!(ids(&out), vec!["iJhz"]);

        let none = filter(catalog(), &HotelFilter::parse("f8c9", "5432").unwrap());
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_set_means_unconstrained() {
        let filter_value = HotelFilter::new(Some(Vec::<String>::new()), Some(vec!["1122"]));
        let out = filter(catalog(), &filter_value);
        assert_eq!(ids(&out), vec!["f8c9"]);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let out = filter(catalog(), &HotelFilter::parse("ijhz", "none").unwrap());
        assert!(out.is_empty());
    }
}
