use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{Address, HotelField, ImageCategory, Images, NormalizedHotelRecord};
use crate::pipeline::processing::clean::{
    clean_address_part, clean_amenities, clean_booking_conditions, clean_coordinates, clean_description, clean_images,
    clean_identifier, clean_name, combined_list_quality, CleanedList, RawImage,
};

/// Base trait for supplier-specific normalizers
pub trait SourceNormalizer: Send + Sync {
    /// Map a raw payload onto the supplier-independent shape.
    ///
    /// `None` only when the payload is not an object at all.
    fn extract(&self, payload: &Value) -> Option<SupplierHotel>;

    /// Extract and clean. `None` when the record has no usable identity.
    fn normalize(&self, source: &str, payload: &Value) -> Option<NormalizedHotelRecord> {
        NormalizerUtils::build_record(source, self.extract(payload)?)
    }
}

/// Supplier-independent view of one raw hotel, before cleaning.
///
/// Every supplier adapter maps its typed payload into this shape, then
/// [`NormalizerUtils::build_record`] applies the field cleaners.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SupplierHotel {
    pub hotel_id: Option<String>,
    pub destination_id: Option<String>,
    pub name: Option<String>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub description: Option<String>,
    /// Several supplier lists can feed the amenity set (general, room, ...)
    pub amenity_lists: Vec<Option<Vec<String>>>,
    pub room_images: Option<Vec<RawImage>>,
    pub site_images: Option<Vec<RawImage>>,
    pub amenity_images: Option<Vec<RawImage>>,
    pub booking_conditions: Option<Vec<String>>,
}

/// Images grouped by category, as Paperflies and Patagonia send them
#[derive(Debug, Default, Deserialize)]
#[serde(bound(deserialize = "I: DeserializeOwned + Default"))]
pub struct ImageGroups<I> {
    #[serde(default, deserialize_with = "lenient_list")]
    pub rooms: Option<Vec<I>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub site: Option<Vec<I>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub amenities: Option<Vec<I>>,
}

impl<I: Into<RawImage>> ImageGroups<I> {
    /// `(rooms, site, amenities)` converted to raw images
    pub fn into_raw(self) -> (Option<Vec<RawImage>>, Option<Vec<RawImage>>, Option<Vec<RawImage>>) {
        let convert = |list: Option<Vec<I>>| list.map(|l| l.into_iter().map(Into::into).collect());
        (convert(self.rooms), convert(self.site), convert(self.amenities))
    }
}

/// Render a scalar JSON value as a string.
///
/// Integers keep their decimal form (`5432`, not `5432.0`). Structured values
/// are malformed for a scalar field and come back empty so the cleaners mark
/// them blank rather than missing.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Some(String::new()),
    }
}

/// Accepts strings and numbers; anything else is treated as blank.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

/// Accepts numbers and numeric strings; anything else is absent.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Accepts a list of scalars or a single string.
///
/// Non-scalar entries become empty strings so they count as raw entries
/// that the cleaners then drop.
pub fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items.iter().map(|v| value_to_string(v).unwrap_or_default()).collect()),
        Some(Value::String(s)) => Some(vec![s]),
        Some(_) => Some(Vec::new()),
    })
}

/// A list whose malformed elements fall back to `T::default()` instead of
/// failing the whole record.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        Some(_) => Some(Vec::new()),
    })
}

/// A nested object that is dropped when it has the wrong shape.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

/// Parse a payload into a supplier DTO. Only a non-object payload fails.
pub fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    if !payload.is_object() {
        return None;
    }
    T::deserialize(payload).ok()
}

/// Utility functions shared by the supplier normalizers
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// Run the field cleaners over a supplier hotel.
    ///
    /// Returns `None` when either identity field is missing or blank.
    pub fn build_record(source: &str, hotel: SupplierHotel) -> Option<NormalizedHotelRecord> {
        let hotel_id = clean_identifier(hotel.hotel_id.as_deref()).value?;
        let destination_id = clean_identifier(hotel.destination_id.as_deref()).value?;

        let mut provenance = BTreeMap::new();

        let name = clean_name(hotel.name.as_deref());
        provenance.insert(HotelField::Name, name.quality);

        let line = clean_address_part(hotel.address_line.as_deref());
        let city = clean_address_part(hotel.city.as_deref());
        let country = clean_address_part(hotel.country.as_deref());
        let postal_code = clean_address_part(hotel.postal_code.as_deref());
        provenance.insert(HotelField::AddressLine, line.quality);
        provenance.insert(HotelField::City, city.quality);
        provenance.insert(HotelField::Country, country.quality);
        provenance.insert(HotelField::PostalCode, postal_code.quality);

        let coordinates = clean_coordinates(hotel.lat, hotel.lng);
        provenance.insert(HotelField::Coordinates, coordinates.quality);

        let description = clean_description(hotel.description.as_deref());
        provenance.insert(HotelField::Description, description.quality);

        let amenities = Self::clean_amenity_lists(&hotel.amenity_lists);
        provenance.insert(HotelField::Amenities, amenities.quality());

        let rooms = clean_images(hotel.room_images.as_deref());
        let site = clean_images(hotel.site_images.as_deref());
        let amenity_images = clean_images(hotel.amenity_images.as_deref());
        provenance.insert(HotelField::Images, combined_list_quality(&[&rooms, &site, &amenity_images]));

        let booking_conditions = clean_booking_conditions(hotel.booking_conditions.as_deref());
        provenance.insert(HotelField::BookingConditions, booking_conditions.quality());

        let mut images = Images::default();
        for (category, cleaned) in ImageCategory::ALL.into_iter().zip([rooms, site, amenity_images]) {
            *images.category_mut(category) = cleaned.items;
        }

        Some(NormalizedHotelRecord {
            hotel_id,
            destination_id,
            name: name.value,
            address: Address {
                line: line.value,
                city: city.value,
                country: country.value,
                postal_code: postal_code.value,
            },
            coordinates: coordinates.value,
            description: description.value,
            amenities: amenities.items,
            images,
            booking_conditions: booking_conditions.items,
            source: source.to_string(),
            provenance,
        })
    }

    /// Concatenate every supplied amenity list, then clean once so dedupe
    /// spans all of them.
    fn clean_amenity_lists(lists: &[Option<Vec<String>>]) -> CleanedList<String> {
        if lists.iter().all(Option::is_none) {
            return clean_amenities::<String>(None);
        }
        let combined: Vec<String> = lists.iter().flatten().flatten().cloned().collect();
        clean_amenities(Some(combined.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldPresence, FieldQuality};
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "lenient_f64")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "lenient_string_list")]
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_lenient_fields() {
        let sample: Sample = parse_payload(&json!({"id": 5432, "lat": "1.25", "tags": ["a", 3, {"x": 1}]})).unwrap();
        assert_eq!(sample.id.as_deref(), Some("5432"));
        assert_eq!(sample.lat, Some(1.25));
        assert_eq!(sample.tags, Some(vec!["a".to_string(), "3".to_string(), String::new()]));

        let sample: Sample = parse_payload(&json!({"id": null, "lat": "", "tags": "pool"})).unwrap();
        assert_eq!(sample.id, None);
        assert_eq!(sample.lat, None);
        assert_eq!(sample.tags, Some(vec!["pool".to_string()]));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(parse_payload::<Sample>(&json!(["not", "an", "object"])).is_none());
        assert!(parse_payload::<Sample>(&json!("string")).is_none());
    }

    #[test]
    fn test_float_ids_render_as_integers() {
        assert_eq!(value_to_string(&json!(5432.0)).as_deref(), Some("5432"));
        assert_eq!(value_to_string(&json!(1.5)).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_build_record_requires_identity() {
        let missing_dest = SupplierHotel {
            hotel_id: Some("iJhz".into()),
            ..Default::default()
        };
        assert!(NormalizerUtils::build_record("acme", missing_dest).is_none());

        let blank_id = SupplierHotel {
            hotel_id: Some("  ".into()),
            destination_id: Some("5432".into()),
            ..Default::default()
        };
        assert!(NormalizerUtils::build_record("acme", blank_id).is_none());
    }

    #[test]
    fn test_build_record_tracks_presence() {
        let hotel = SupplierHotel {
            hotel_id: Some("iJhz".into()),
            destination_id: Some("5432".into()),
            name: Some("Beach Villas Singapore".into()),
            city: Some("   ".into()),
            amenity_lists: vec![Some(vec!["Pool".into(), "WiFi ".into()]), None, Some(vec!["pool".into()])],
            ..Default::default()
        };
        let record = NormalizerUtils::build_record("acme", hotel).unwrap();

        assert_eq!(record.amenities, vec!["pool", "wifi"]);
        assert_eq!(record.address.city, None);
        assert_eq!(record.quality(HotelField::City).presence, FieldPresence::Blank);
        assert_eq!(record.quality(HotelField::Country), FieldQuality::MISSING);
        assert_eq!(record.quality(HotelField::Name).score, 1.0);
        assert_eq!(record.source, "acme");
    }
}
