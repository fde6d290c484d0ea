// src/models/category.rs
// DOCUMENTATION: Repair categories offered by the booking product
// PURPOSE: Fixed category set with search terms and synthetic name pools

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DiscoveryError;

/// Appliance repair category
/// DOCUMENTATION: The wire id of each category doubles as the search term
/// sent to the places provider (e.g. "AC repair").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "washing machine repair")]
    WashingMachine,
    #[serde(rename = "AC repair")]
    AirConditioning,
    #[serde(rename = "refrigerator repair")]
    Refrigerator,
    #[serde(rename = "TV repair")]
    Television,
    #[serde(rename = "microwave repair")]
    Microwave,
    #[serde(rename = "water purifier repair")]
    WaterPurifier,
}

/// Name used for synthetic listings when no category is selected
pub const GENERIC_PROVIDER_NAME: &str = "Home Appliance Repair";

impl Category {
    pub const ALL: [Category; 6] = [
        Category::WashingMachine,
        Category::AirConditioning,
        Category::Refrigerator,
        Category::Television,
        Category::Microwave,
        Category::WaterPurifier,
    ];

    /// Search term sent as the `q` parameter
    pub fn search_term(&self) -> &'static str {
        match self {
            Category::WashingMachine => "washing machine repair",
            Category::AirConditioning => "AC repair",
            Category::Refrigerator => "refrigerator repair",
            Category::Television => "TV repair",
            Category::Microwave => "microwave repair",
            Category::WaterPurifier => "water purifier repair",
        }
    }

    /// Short label shown on the category picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::WashingMachine => "Washing Machine",
            Category::AirConditioning => "Air Conditioning",
            Category::Refrigerator => "Refrigerator",
            Category::Television => "TV",
            Category::Microwave => "Microwave",
            Category::WaterPurifier => "RO",
        }
    }

    /// Provider names used by the fallback generator
    pub fn mock_names(&self) -> &'static [&'static str] {
        match self {
            Category::WashingMachine => &[
                "Quick Wash Repairs",
                "SpinMaster Fixes",
                "CleanCycle Services",
            ],
            Category::AirConditioning => &[
                "CoolAir Technicians",
                "Freeze Fix Pro",
                "Climate Control Experts",
            ],
            Category::Refrigerator => &["FridgeFix Pro", "CoolKeeper Services", "Fresh Solutions"],
            Category::Television => &[
                "ScreenFix Masters",
                "PixelPerfect Repairs",
                "ViewTech Services",
            ],
            Category::Microwave => &["MicroWizards", "QuickHeat Repairs", "WaveMaster Services"],
            Category::WaterPurifier => &[
                "PureFlow Technicians",
                "AquaFix Pro",
                "ClearWater Services",
            ],
        }
    }

    /// Parse an optional query value; blank means no category
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Category>, DiscoveryError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl FromStr for Category {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.search_term().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DiscoveryError::InvalidInput(format!("Unknown category: {}", needle)))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.search_term())
    }
}

/// Category entry returned by GET /services/categories
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: &'static str,
    pub name: &'static str,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            id: category.search_term(),
            name: category.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("AC repair".parse::<Category>().ok(), Some(Category::AirConditioning));
        assert_eq!("ac REPAIR".parse::<Category>().ok(), Some(Category::AirConditioning));
        assert!("plumbing".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert!(matches!(Category::parse_optional(None), Ok(None)));
        assert!(matches!(Category::parse_optional(Some("  ")), Ok(None)));
        assert!(matches!(
            Category::parse_optional(Some("TV repair")),
            Ok(Some(Category::Television))
        ));
    }

    #[test]
    fn test_serde_uses_search_term() {
        let json = serde_json::to_string(&Category::WaterPurifier).unwrap();
        assert_eq!(json, "\"water purifier repair\"");
    }

    #[test]
    fn test_every_category_has_a_name_pool() {
        for category in Category::ALL {
            assert!(!category.mock_names().is_empty());
        }
    }
}
