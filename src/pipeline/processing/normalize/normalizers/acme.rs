use serde::Deserialize;
use serde_json::Value;

use super::base::{
    lenient_f64, lenient_list, lenient_string, lenient_string_list, parse_payload, SourceNormalizer, SupplierHotel,
};
use crate::pipeline::processing::clean::RawImage;

/// Acme payload: flat PascalCase object
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AcmeHotel {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    destination_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    facilities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    room_facilities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    images: Option<Vec<AcmeImage>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    booking_conditions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct AcmeImage {
    #[serde(default, deserialize_with = "lenient_string")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

impl From<AcmeImage> for RawImage {
    fn from(img: AcmeImage) -> Self {
        RawImage { url: img.link, description: img.description }
    }
}

/// Normalizer for the Acme supplier.
///
/// Acme sends a flat image list with no category; those images land in `site`.
pub struct AcmeNormalizer;

impl SourceNormalizer for AcmeNormalizer {
    fn extract(&self, payload: &Value) -> Option<SupplierHotel> {
        let dto: AcmeHotel = parse_payload(payload)?;
        Some(SupplierHotel {
            hotel_id: dto.id,
            destination_id: dto.destination_id,
            name: dto.name,
            address_line: dto.address,
            city: dto.city,
            country: dto.country,
            postal_code: dto.postal_code,
            lat: dto.latitude,
            lng: dto.longitude,
            description: dto.description,
            amenity_lists: vec![dto.facilities, dto.room_facilities],
            room_images: None,
            site_images: dto.images.map(|list| list.into_iter().map(RawImage::from).collect()),
            amenity_images: None,
            booking_conditions: dto.booking_conditions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_acme_record() {
        let payload = json!({
            "Id": "iJhz",
            "DestinationId": 5432,
            "Name": "Beach Villas Singapore",
            "Latitude": 1.264751,
            "Longitude": 103.824006,
            "Address": " 8 Sentosa Gateway, Beach Villas ",
            "City": "Singapore",
            "Country": "SG",
            "PostalCode": "098269",
            "Description": "  This 5 star hotel is located on the coastline of Singapore.",
            "Facilities": ["Pool", "BusinessCenter", "WiFi ", "DryCleaning", " Breakfast"]
        });

        let record = AcmeNormalizer.normalize("acme", &payload).unwrap();
        assert_eq!(record.hotel_id, "iJhz");
        assert_eq!(record.destination_id, "5432");
        assert_eq!(record.address.line.as_deref(), Some("8 Sentosa Gateway, Beach Villas"));
        assert_eq!(record.address.postal_code.as_deref(), Some("098269"));
        assert_eq!(
            record.amenities,
            vec!["pool", "business center", "wifi", "dry cleaning", "breakfast"]
        );
        assert!(record.coordinates.is_some());
        assert!(record.images.is_empty());
    }

    #[test]
    fn test_acme_blank_coordinates_and_nulls() {
        let payload = json!({
            "Id": "f8c9",
            "DestinationId": 1122,
            "Name": "Hilton Shinjuku Tokyo",
            "Latitude": "",
            "Longitude": "",
            "Address": "160-0023, SHINJUKU-KU, 6-6-2 NISHI-SHINJUKU, JAPAN",
            "City": "Tokyo",
            "Country": "JP",
            "PostalCode": "160-0023",
            "Description": null,
            "Facilities": null
        });

        let record = AcmeNormalizer.normalize("acme", &payload).unwrap();
        assert_eq!(record.coordinates, None);
        assert_eq!(record.description, None);
        assert!(record.amenities.is_empty());
    }
}
