use crate::pricing::{parse_price, PriceBucket};
use scraper::Html;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend identifier of a property listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub i64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub i64);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a property is offered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListingType {
    ForSale,
    ForRent,
    ForLease,
    PreSelling,
    Other(String),
}

impl ListingType {
    /// Parse a backend label. Accepts "For Sale", "for_sale", "for-sale", ...
    pub fn from_label(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "forsale" | "sale" => ListingType::ForSale,
            "forrent" | "rent" => ListingType::ForRent,
            "forlease" | "lease" => ListingType::ForLease,
            "preselling" => ListingType::PreSelling,
            _ => ListingType::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ListingType::ForSale => "For Sale",
            ListingType::ForRent => "For Rent",
            ListingType::ForLease => "For Lease",
            ListingType::PreSelling => "Pre-Selling",
            ListingType::Other(label) => label,
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ListingType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ListingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ListingType::from_label(&raw))
    }
}

/// Listing-type tags of a property.
///
/// The backend sends either a single label or an array of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListingTypes(pub Vec<ListingType>);

impl ListingTypes {
    pub fn contains(&self, listing_type: &ListingType) -> bool {
        self.0.contains(listing_type)
    }

    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(ListingType::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'de> Deserialize<'de> for ListingTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        let tags = match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(label)) if label.trim().is_empty() => Vec::new(),
            Some(OneOrMany::One(label)) => vec![ListingType::from_label(&label)],
            Some(OneOrMany::Many(labels)) => labels
                .iter()
                .filter(|label| !label.trim().is_empty())
                .map(|label| ListingType::from_label(label))
                .collect(),
        };

        Ok(ListingTypes(tags))
    }
}

/// Location information for a property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub address: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if !self.address.is_empty() {
            parts.push(&self.address);
        }
        if let Some(area) = self.area.as_deref().filter(|a| !a.is_empty()) {
            parts.push(area);
        }
        if !self.city.is_empty() {
            parts.push(&self.city);
        }
        f.write_str(&parts.join(", "))
    }
}

/// Boolean amenity flags shown in the comparison table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenities {
    pub swimming_pool: bool,
    pub gym: bool,
    pub parking: bool,
    pub security: bool,
    pub garden: bool,
    pub elevator: bool,
}

impl Amenities {
    /// Display name and flag of every amenity, in table order
    pub fn entries(&self) -> [(&'static str, bool); 6] {
        [
            ("Swimming pool", self.swimming_pool),
            ("Gym", self.gym),
            ("Parking", self.parking),
            ("Security", self.security),
            ("Garden", self.garden),
            ("Elevator", self.elevator),
        ]
    }
}

/// Property listing as returned by the backend. This is the item users can
/// pick for side-by-side comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    #[serde(default)]
    pub location: Location,
    /// Raw price as entered in the admin console, e.g. "₱1,000,000.00"
    #[serde(deserialize_with = "price_as_string")]
    pub price: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub floor_area: Option<f64>,
    #[serde(default)]
    pub lot_area: Option<f64>,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub listing_types: ListingTypes,
    #[serde(default)]
    pub description: String,
}

impl Property {
    pub fn numeric_price(&self) -> f64 {
        parse_price(&self.price)
    }

    pub fn price_bucket(&self) -> PriceBucket {
        PriceBucket::of(self.numeric_price())
    }

    /// Description with markup removed
    pub fn summary(&self) -> String {
        plain_text(&self.description)
    }
}

/// The admin console stores prices as text but older records hold numbers.
fn price_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawPrice::deserialize(deserializer)? {
        RawPrice::Text(text) => text,
        RawPrice::Number(number) => number.to_string(),
    })
}

/// Job opening listed on the careers page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub posted_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Pending,
    InterviewScheduled,
    RescheduleRequested,
    Hired,
    Rejected,
}

/// Job applicant with the interview the admin scheduled for them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub job_id: JobId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub status: ApplicantStatus,
    /// Interview date-time set by the admin
    #[serde(default)]
    pub interview_at: Option<String>,
    #[serde(default)]
    pub reschedule_requested_at: Option<String>,
}

impl Applicant {
    /// Whether this applicant already used their one reschedule request
    pub fn reschedule_submitted(&self) -> bool {
        self.status == ApplicantStatus::RescheduleRequested
            || self
                .reschedule_requested_at
                .as_deref()
                .is_some_and(|at| !at.trim().is_empty())
    }
}

/// Strip markup from a rich-text field and collapse whitespace
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Built-in catalogue used when the backend cannot be reached
pub fn sample_properties() -> Vec<Property> {
    vec![
        Property {
            id: PropertyId(1),
            name: "Azure Residences Unit 12B".to_string(),
            location: Location {
                city: "Parañaque".to_string(),
                area: Some("Bicutan".to_string()),
                address: "Dr. A. Santos Ave".to_string(),
            },
            price: "₱4,850,000.00".to_string(),
            image: None,
            amenities: Amenities {
                swimming_pool: true,
                gym: true,
                parking: true,
                security: true,
                garden: false,
                elevator: true,
            },
            bedrooms: Some(2),
            bathrooms: Some(1),
            floor_area: Some(48.5),
            lot_area: None,
            floors: Some(1),
            listing_types: ListingTypes(vec![ListingType::ForSale]),
            description: "<p>Condo unit with <b>pool view</b>.</p>".to_string(),
        },
        Property {
            id: PropertyId(2),
            name: "Greenfield Townhouse".to_string(),
            location: Location {
                city: "Santa Rosa".to_string(),
                area: Some("Laguna".to_string()),
                address: "Greenfield City".to_string(),
            },
            price: "₱7,200,000.00".to_string(),
            image: None,
            amenities: Amenities {
                parking: true,
                security: true,
                garden: true,
                ..Amenities::default()
            },
            bedrooms: Some(3),
            bathrooms: Some(2),
            floor_area: Some(110.0),
            lot_area: Some(80.0),
            floors: Some(2),
            listing_types: ListingTypes(vec![ListingType::ForSale, ListingType::PreSelling]),
            description: "<p>Two-storey townhouse near the expressway.</p>".to_string(),
        },
        Property {
            id: PropertyId(3),
            name: "Makati Studio".to_string(),
            location: Location {
                city: "Makati".to_string(),
                area: Some("Poblacion".to_string()),
                address: "Kalayaan Ave".to_string(),
            },
            price: "₱25,000".to_string(),
            image: None,
            amenities: Amenities {
                gym: true,
                security: true,
                elevator: true,
                ..Amenities::default()
            },
            bedrooms: Some(0),
            bathrooms: Some(1),
            floor_area: Some(24.0),
            lot_area: None,
            floors: None,
            listing_types: ListingTypes(vec![ListingType::ForRent]),
            description: "Fully furnished studio.".to_string(),
        },
        Property {
            id: PropertyId(4),
            name: "Tagaytay Ridge Lot".to_string(),
            location: Location {
                city: "Tagaytay".to_string(),
                area: None,
                address: "Aguinaldo Highway".to_string(),
            },
            price: "₱12,500,000.00".to_string(),
            image: None,
            amenities: Amenities::default(),
            bedrooms: None,
            bathrooms: None,
            floor_area: None,
            lot_area: Some(600.0),
            floors: None,
            listing_types: ListingTypes(vec![ListingType::ForSale]),
            description: "Residential lot with taal view.".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_types_accept_single_label() {
        let tags: ListingTypes = serde_json::from_value(json!("For Sale")).unwrap();
        assert_eq!(tags.0, vec![ListingType::ForSale]);
    }

    #[test]
    fn test_listing_types_accept_array() {
        let tags: ListingTypes = serde_json::from_value(json!(["for_rent", "Pre-Selling"])).unwrap();
        assert_eq!(tags.0, vec![ListingType::ForRent, ListingType::PreSelling]);
        assert_eq!(tags.joined(), "For Rent, Pre-Selling");
    }

    #[test]
    fn test_unknown_listing_type_is_kept() {
        assert_eq!(
            ListingType::from_label(" Rent-to-Own "),
            ListingType::Other("Rent-to-Own".to_string())
        );
    }

    #[test]
    fn test_property_decodes_numeric_price_and_defaults() {
        let property: Property = serde_json::from_value(json!({
            "id": 7,
            "name": "Lot 7",
            "price": 1500000,
            "listing_types": null
        }))
        .unwrap();

        assert_eq!(property.id, PropertyId(7));
        assert_eq!(property.price, "1500000");
        assert_eq!(property.price_bucket(), PriceBucket::OneToFiveMillion);
        assert!(property.listing_types.0.is_empty());
        assert_eq!(property.amenities, Amenities::default());
    }

    #[test]
    fn test_property_decode_rejects_missing_id() {
        let result = serde_json::from_value::<Property>(json!({ "name": "x", "price": "1" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_plain_text_strips_markup() {
        assert_eq!(
            plain_text("<p>Condo unit with <b>pool view</b>.</p>\n<p> Near  mall</p>"),
            "Condo unit with pool view. Near mall"
        );
    }

    #[test]
    fn test_reschedule_submitted() {
        let mut applicant = Applicant {
            id: ApplicantId(1),
            job_id: JobId(2),
            name: "Ana".to_string(),
            email: String::new(),
            status: ApplicantStatus::InterviewScheduled,
            interview_at: Some("2025-01-03T10:00:00".to_string()),
            reschedule_requested_at: None,
        };
        assert!(!applicant.reschedule_submitted());

        applicant.reschedule_requested_at = Some("2025-01-06T09:00:00".to_string());
        assert!(applicant.reschedule_submitted());

        applicant.reschedule_requested_at = None;
        applicant.status = ApplicantStatus::RescheduleRequested;
        assert!(applicant.reschedule_submitted());
    }

    #[test]
    fn test_location_display_skips_empty_parts() {
        let location = Location {
            city: "Makati".to_string(),
            area: None,
            address: "Kalayaan Ave".to_string(),
        };
        assert_eq!(location.to_string(), "Kalayaan Ave, Makati");
    }
}
