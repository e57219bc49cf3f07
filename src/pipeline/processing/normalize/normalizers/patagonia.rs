use serde::Deserialize;
use serde_json::Value;

use super::base::{
    lenient_f64, lenient_object, lenient_string, lenient_string_list, parse_payload, ImageGroups, SourceNormalizer,
    SupplierHotel,
};
use crate::pipeline::processing::clean::RawImage;

#[derive(Debug, Default, Deserialize)]
struct PatagoniaHotel {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    destination: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    amenities: Option<Vec<String>>,
    #[serde(rename = "General", default, deserialize_with = "lenient_string_list")]
    general: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_object")]
    images: Option<ImageGroups<PatagoniaImage>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    booking_conditions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct PatagoniaImage {
    #[serde(default, deserialize_with = "lenient_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

impl From<PatagoniaImage> for RawImage {
    fn from(img: PatagoniaImage) -> Self {
        RawImage { url: img.url, description: img.description }
    }
}

/// Normalizer for the Patagonia supplier: flat lowercase fields, `info` as description
pub struct PatagoniaNormalizer;

impl SourceNormalizer for PatagoniaNormalizer {
    fn extract(&self, payload: &Value) -> Option<SupplierHotel> {
        let dto: PatagoniaHotel = parse_payload(payload)?;
        let (room_images, site_images, amenity_images) = dto.images.unwrap_or_default().into_raw();

        Some(SupplierHotel {
            hotel_id: dto.id,
            destination_id: dto.destination,
            name: dto.name,
            address_line: dto.address,
            city: dto.city,
            country: dto.country,
            postal_code: dto.postal_code,
            lat: dto.lat,
            lng: dto.lng,
            description: dto.info,
            amenity_lists: vec![dto.amenities, dto.general],
            room_images,
            site_images,
            amenity_images,
            booking_conditions: dto.booking_conditions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_patagonia_record() {
        let payload = json!({
            "id": "iJhz",
            "destination": 5432,
            "name": "Beach Villas Singapore",
            "lat": 1.264751,
            "lng": 103.824006,
            "address": "8 Sentosa Gateway, Beach Villas, 098269",
            "info": "Located at the western tip of Resorts World Sentosa, guests at the Beach Villas are guaranteed privacy while they enjoy spectacular views of glittering waters.",
            "amenities": ["Aircon", "Tv", "Coffee machine", "Kettle", "Hair dryer", "Iron", "Tub"],
            "images": {
                "rooms": [
                    {"url": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/2.jpg", "description": "Double room"},
                    {"url": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/4.jpg", "description": "Bathroom"}
                ],
                "amenities": [
                    {"url": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/0.jpg", "description": "RTV"}
                ]
            }
        });

        let record = PatagoniaNormalizer.normalize("patagonia", &payload).unwrap();
        assert_eq!(record.destination_id, "5432");
        assert_eq!(record.amenities[0], "aircon");
        assert_eq!(record.amenities.len(), 7);
        assert_eq!(record.images.rooms.len(), 2);
        assert_eq!(record.images.amenities.len(), 1);
        assert!(record.booking_conditions.is_empty());
        assert!(record.description.as_deref().unwrap_or_default().starts_with("Located at"));
    }

    #[test]
    fn test_patagonia_null_info_and_address() {
        let payload = json!({
            "id": "f8c9",
            "destination": 1122,
            "name": "Hilton Tokyo",
            "lat": 35.6926,
            "lng": 139.690965,
            "address": null,
            "info": null,
            "amenities": null,
            "images": {"rooms": [], "amenities": []}
        });

        let record = PatagoniaNormalizer.normalize("patagonia", &payload).unwrap();
        assert_eq!(record.address.line, None);
        assert_eq!(record.description, None);
        assert!(record.images.is_empty());
    }
}
