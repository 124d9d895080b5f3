use crate::compare::ComparisonSet;
use crate::models::{Property, PropertyId};
use crate::pricing::format_price;
use serde::Serialize;

const MISSING: &str = "-";

/// One attribute across every compared listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub values: Vec<String>,
}

/// Comparison laid out attribute-per-row, listing-per-column, the shape the
/// export needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub ids: Vec<PropertyId>,
    /// Column headers (listing names)
    pub columns: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Build the table for the current selection. Ids that no longer resolve
    /// against `properties` are skipped.
    pub fn build(set: &ComparisonSet, properties: &[Property]) -> Self {
        let selected: Vec<&Property> = set
            .ids()
            .iter()
            .filter_map(|id| properties.iter().find(|p| p.id == *id))
            .collect();

        Self::from_properties(&selected)
    }

    pub fn from_properties(selected: &[&Property]) -> Self {
        let mut rows = vec![
            row(selected, "Price", |p| format_price(p.numeric_price())),
            row(selected, "Price range", |p| p.price_bucket().to_string()),
            row(selected, "Location", |p| non_empty(p.location.to_string())),
            row(selected, "Listing type", |p| non_empty(p.listing_types.joined())),
            row(selected, "Bedrooms", |p| count(p.bedrooms)),
            row(selected, "Bathrooms", |p| count(p.bathrooms)),
            row(selected, "Floor area", |p| area(p.floor_area)),
            row(selected, "Lot area", |p| area(p.lot_area)),
            row(selected, "Floors", |p| count(p.floors)),
        ];

        // Amenity order is fixed, so read labels off the first listing
        if let Some(first) = selected.first() {
            for (idx, (label, _)) in first.amenities.entries().iter().enumerate() {
                rows.push(row(selected, label, |p| {
                    yes_no(p.amenities.entries()[idx].1).to_string()
                }));
            }
        }

        Self {
            ids: selected.iter().map(|p| p.id).collect(),
            columns: selected.iter().map(|p| p.name.clone()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn row<F>(selected: &[&Property], label: &str, value: F) -> ComparisonRow
where
    F: Fn(&Property) -> String,
{
    ComparisonRow {
        label: label.to_string(),
        values: selected.iter().map(|&p| value(p)).collect(),
    }
}

fn non_empty(value: String) -> String {
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value
    }
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn area(value: Option<f64>) -> String {
    match value {
        Some(sqm) if sqm.fract() == 0.0 => format!("{} sqm", sqm as i64),
        Some(sqm) => format!("{:.1} sqm", sqm),
        None => MISSING.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
