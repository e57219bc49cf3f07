use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Known supplier payload schemas. Each variant has exactly one extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierSchema {
    Acme,
    Paperflies,
    Patagonia,
}

impl SupplierSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierSchema::Acme => crate::common::constants::ACME_SUPPLIER,
            SupplierSchema::Paperflies => crate::common::constants::PAPERFLIES_SUPPLIER,
            SupplierSchema::Patagonia => crate::common::constants::PATAGONIA_SUPPLIER,
        }
    }
}

impl fmt::Display for SupplierSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hotel object exactly as a supplier returned it, tagged with its origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHotelRecord {
    /// Supplier tag (config name), carried into provenance
    pub supplier: String,
    /// Which extraction rule applies to `payload`
    pub schema: SupplierSchema,
    pub payload: serde_json::Value,
}

impl RawHotelRecord {
    pub fn new(supplier: impl Into<String>, schema: SupplierSchema, payload: serde_json::Value) -> Self {
        Self {
            supplier: supplier.into(),
            schema,
            payload,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Rooms,
    Site,
    Amenities,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 3] = [ImageCategory::Rooms, ImageCategory::Site, ImageCategory::Amenities];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    pub rooms: Vec<Image>,
    pub site: Vec<Image>,
    pub amenities: Vec<Image>,
}

impl Images {
    pub fn category(&self, category: ImageCategory) -> &Vec<Image> {
        match category {
            ImageCategory::Rooms => &self.rooms,
            ImageCategory::Site => &self.site,
            ImageCategory::Amenities => &self.amenities,
        }
    }

    pub fn category_mut(&mut self, category: ImageCategory) -> &mut Vec<Image> {
        match category {
            ImageCategory::Rooms => &mut self.rooms,
            ImageCategory::Site => &mut self.site,
            ImageCategory::Amenities => &mut self.amenities,
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len() + self.site.len() + self.amenities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fields tracked in provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelField {
    Name,
    AddressLine,
    City,
    Country,
    PostalCode,
    Coordinates,
    Description,
    Amenities,
    Images,
    BookingConditions,
}

/// Whether a supplier said anything about a field.
///
/// `Blank` means the supplier sent a value that cleaned down to nothing,
/// which is different from not sending the field at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPresence {
    Missing,
    Blank,
    Present,
}

/// Per-field provenance and data-quality score of a normalized record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldQuality {
    pub presence: FieldPresence,
    /// 0.0 (absent) to 1.0 (taken as-is)
    pub score: f32,
}

impl FieldQuality {
    pub const MISSING: FieldQuality = FieldQuality { presence: FieldPresence::Missing, score: 0.0 };
    pub const BLANK: FieldQuality = FieldQuality { presence: FieldPresence::Blank, score: 0.0 };

    pub fn present(score: f32) -> Self {
        Self {
            presence: FieldPresence::Present,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// The `(hotel_id, destination_id)` pair identifying one physical hotel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey {
    pub hotel_id: String,
    pub destination_id: String,
}

impl IdentityKey {
    pub fn new(hotel_id: impl Into<String>, destination_id: impl Into<String>) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            destination_id: destination_id.into(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.hotel_id, self.destination_id)
    }
}

/// Canonical per-supplier hotel record produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHotelRecord {
    pub hotel_id: String,
    pub destination_id: String,
    pub name: Option<String>,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub images: Images,
    pub booking_conditions: Vec<String>,
    /// Supplier tag this record came from
    pub source: String,
    pub provenance: BTreeMap<HotelField, FieldQuality>,
}

impl NormalizedHotelRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(self.hotel_id.clone(), self.destination_id.clone())
    }

    pub fn quality(&self, field: HotelField) -> FieldQuality {
        self.provenance.get(&field).copied().unwrap_or(FieldQuality::MISSING)
    }
}

/// One canonical hotel, merged from every record sharing an identity key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedHotel {
    pub hotel_id: String,
    pub destination_id: String,
    pub name: Option<String>,
    pub address: Address,
    #[serde(rename = "location")]
    pub coordinates: Option<Coordinates>,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub images: Images,
    pub booking_conditions: Vec<String>,
    /// Supplier tags of the bucket members, first-seen order
    #[serde(skip_serializing)]
    pub sources: Vec<String>,
    /// Which supplier supplied each single-valued field
    #[serde(skip_serializing)]
    pub provenance: BTreeMap<HotelField, String>,
}

impl MergedHotel {
    /// Serialization view that includes `sources` and `provenance`.
    pub fn with_provenance(&self) -> HotelWithProvenance<'_> {
        HotelWithProvenance {
            hotel: self,
            sources: &self.sources,
            provenance: &self.provenance,
        }
    }
}

/// A singleton bucket: the record's content, unchanged.
impl From<&NormalizedHotelRecord> for MergedHotel {
    fn from(record: &NormalizedHotelRecord) -> Self {
        let mut provenance = BTreeMap::new();
        let single_valued = [
            (HotelField::Name, record.name.is_some()),
            (HotelField::AddressLine, record.address.line.is_some()),
            (HotelField::City, record.address.city.is_some()),
            (HotelField::Country, record.address.country.is_some()),
            (HotelField::PostalCode, record.address.postal_code.is_some()),
            (HotelField::Coordinates, record.coordinates.is_some()),
            (HotelField::Description, record.description.is_some()),
        ];
        for (field, present) in single_valued {
            if present {
                provenance.insert(field, record.source.clone());
            }
        }

        Self {
            hotel_id: record.hotel_id.clone(),
            destination_id: record.destination_id.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            coordinates: record.coordinates,
            description: record.description.clone(),
            amenities: record.amenities.clone(),
            images: record.images.clone(),
            booking_conditions: record.booking_conditions.clone(),
            sources: vec![record.source.clone()],
            provenance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HotelWithProvenance<'a> {
    #[serde(flatten)]
    pub hotel: &'a MergedHotel,
    pub sources: &'a [String],
    pub provenance: &'a BTreeMap<HotelField, String>,
}

/// Ordered output of one pipeline run
pub type HotelCatalog = Vec<MergedHotel>;
