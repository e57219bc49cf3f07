use serde::Deserialize;
use serde_json::Value;

use super::base::{
    lenient_f64, lenient_object, lenient_string, lenient_string_list, parse_payload, ImageGroups, SourceNormalizer,
    SupplierHotel,
};
use crate::pipeline::processing::clean::RawImage;

#[derive(Debug, Default, Deserialize)]
struct PaperfliesHotel {
    #[serde(default, deserialize_with = "lenient_string")]
    hotel_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    destination_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    hotel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    location: Option<PaperfliesLocation>,
    #[serde(default, deserialize_with = "lenient_string")]
    details: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    amenities: Option<PaperfliesAmenities>,
    #[serde(default, deserialize_with = "lenient_object")]
    images: Option<ImageGroups<PaperfliesImage>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    booking_conditions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct PaperfliesLocation {
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lng: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PaperfliesAmenities {
    #[serde(default, deserialize_with = "lenient_string_list")]
    general: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    room: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct PaperfliesImage {
    #[serde(default, deserialize_with = "lenient_string")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    caption: Option<String>,
}

impl From<PaperfliesImage> for RawImage {
    fn from(img: PaperfliesImage) -> Self {
        RawImage { url: img.link, description: img.caption }
    }
}

/// Normalizer for the Paperflies supplier: nested location, split amenities
pub struct PaperfliesNormalizer;

impl SourceNormalizer for PaperfliesNormalizer {
    fn extract(&self, payload: &Value) -> Option<SupplierHotel> {
        let dto: PaperfliesHotel = parse_payload(payload)?;
        let location = dto.location.unwrap_or_default();
        let amenities = dto.amenities.unwrap_or_default();
        let (room_images, site_images, amenity_images) = dto.images.unwrap_or_default().into_raw();

        Some(SupplierHotel {
            hotel_id: dto.hotel_id,
            destination_id: dto.destination_id,
            name: dto.hotel_name,
            address_line: location.address,
            city: location.city,
            country: location.country,
            postal_code: location.postal_code,
            lat: location.lat,
            lng: location.lng,
            description: dto.details,
            amenity_lists: vec![amenities.general, amenities.room],
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

    fn sample() -> Value {
        json!({
            "hotel_id": "iJhz",
            "destination_id": 5432,
            "hotel_name": "Beach Villas Singapore",
            "location": {
                "address": "8 Sentosa Gateway, Beach Villas, 098269",
                "country": "Singapore"
            },
            "details": "Surrounded by tropical gardens, these upscale villas in elegant Colonial-style buildings are part of the Resorts World Sentosa complex.",
            "amenities": {
                "general": ["outdoor pool", "indoor pool", "business center", "childcare"],
                "room": ["tv", "coffee machine", "kettle", "hair dryer", "iron"]
            },
            "images": {
                "rooms": [
                    {"link": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/2.jpg", "caption": "Double room"},
                    {"link": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/3.jpg", "caption": "Double room"}
                ],
                "site": [
                    {"link": "https://d2ey9sqrvkqdfs.cloudfront.net/0qZF/1.jpg", "caption": "Front"}
                ]
            },
            "booking_conditions": [
                "All children are welcome.",
                "Pets are not allowed."
            ]
        })
    }

    #[test]
    fn test_normalize_paperflies_record() {
        let record = PaperfliesNormalizer.normalize("paperflies", &sample()).unwrap();
        assert_eq!(record.hotel_id, "iJhz");
        assert_eq!(record.destination_id, "5432");
        assert_eq!(record.address.country.as_deref(), Some("Singapore"));
        assert_eq!(record.address.city, None);
        assert_eq!(record.amenities.len(), 9);
        assert_eq!(record.images.rooms.len(), 2);
        assert_eq!(record.images.site[0].description.as_deref(), Some("Front"));
        assert!(record.images.amenities.is_empty());
        assert_eq!(record.booking_conditions.len(), 2);
    }

    #[test]
    fn test_malformed_nested_fields_do_not_reject_record() {
        let payload = json!({
            "hotel_id": "SjyX",
            "destination_id": 5432,
            "hotel_name": "InterContinental",
            "location": "somewhere",
            "amenities": ["pool"],
            "images": {"rooms": ["not-an-object", {"link": "https://example.com/r.jpg"}]}
        });
        let record = PaperfliesNormalizer.normalize("paperflies", &payload).unwrap();
        assert_eq!(record.address.line, None);
        assert!(record.amenities.is_empty());
        assert_eq!(record.images.rooms.len(), 1);
        assert_eq!(record.images.rooms[0].description, None);
    }
}
