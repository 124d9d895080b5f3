use crate::models::{ListingType, Property};
use crate::pricing::PriceBucket;
use serde::{Deserialize, Serialize};

/// Filters for the public property search page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free text matched against name, address, area and city
    pub query: Option<String>,
    /// Price range
    pub bucket: Option<PriceBucket>,
    /// For sale / for rent / ...
    pub listing_type: Option<ListingType>,
    /// Minimum number of bedrooms
    pub min_bedrooms: Option<u32>,
}

impl SearchParams {
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let haystacks = [
                Some(property.name.as_str()),
                Some(property.location.address.as_str()),
                property.location.area.as_deref(),
                Some(property.location.city.as_str()),
            ];
            let hit = haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(bucket) = self.bucket {
            if property.price_bucket() != bucket {
                return false;
            }
        }

        if let Some(listing_type) = &self.listing_type {
            if !property.listing_types.contains(listing_type) {
                return false;
            }
        }

        if let Some(min) = self.min_bedrooms {
            if property.bedrooms.unwrap_or(0) < min {
                return false;
            }
        }

        true
    }

    /// Listings matching every set filter, in their original order
    pub fn filter<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }
}
