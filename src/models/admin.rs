//! Address categories derived from class/type and place rank.

use serde::{Deserialize, Serialize};

/// Label an ancestor contributes to an address.
///
/// Administrative boundaries are labeled by place rank; `place=*` nodes by their
/// type; anything else keeps its own type as label (e.g. `dog_park`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressCategory {
    /// Country (rank 4)
    Country,
    /// State / province / region (rank 5-9)
    State,
    /// Region below state level (rank 10-11)
    StateDistrict,
    /// County / district (rank 12-13)
    County,
    /// Municipality (rank 14-15)
    Municipality,
    /// City (rank 16)
    City,
    Town,
    Village,
    Hamlet,
    /// Suburb / borough / quarter (rank 17-21)
    Suburb,
    /// Neighbourhood (rank 22-25)
    Neighbourhood,
    /// Street (rank 26-27)
    Road,
    HouseNumber,
    Postcode,
    /// Non-administrative feature labeled by its own type
    Feature(String),
}

/// Types that carry no information as an address label.
const GENERIC_TYPES: &[&str] = &["yes", "unknown", "unclassified", ""];

impl AddressCategory {
    /// Category for a boundary with the given place rank.
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            4 => Some(AddressCategory::Country),
            5..=9 => Some(AddressCategory::State),
            10..=11 => Some(AddressCategory::StateDistrict),
            12..=13 => Some(AddressCategory::County),
            14..=15 => Some(AddressCategory::Municipality),
            16 => Some(AddressCategory::City),
            17..=21 => Some(AddressCategory::Suburb),
            22..=25 => Some(AddressCategory::Neighbourhood),
            26..=27 => Some(AddressCategory::Road),
            28..=30 => Some(AddressCategory::HouseNumber),
            _ => None,
        }
    }

    /// Category for a place, or `None` when its type is generic.
    pub fn for_place(class: &str, place_type: &str, rank: u8) -> Option<Self> {
        if Self::is_generic(place_type) {
            return None;
        }

        match (class, place_type) {
            ("place", "country") => Some(AddressCategory::Country),
            ("place", "state" | "province" | "region") => Some(AddressCategory::State),
            ("place", "state_district") => Some(AddressCategory::StateDistrict),
            ("place", "county" | "district") => Some(AddressCategory::County),
            ("place", "municipality") => Some(AddressCategory::Municipality),
            ("place", "city") => Some(AddressCategory::City),
            ("place", "town") => Some(AddressCategory::Town),
            ("place", "village") => Some(AddressCategory::Village),
            ("place", "hamlet" | "isolated_dwelling" | "farm") => Some(AddressCategory::Hamlet),
            ("place", "suburb" | "borough" | "quarter" | "city_district") => {
                Some(AddressCategory::Suburb)
            }
            ("place", "neighbourhood" | "city_block") => Some(AddressCategory::Neighbourhood),
            ("place", "postcode") | ("boundary", "postal_code") => Some(AddressCategory::Postcode),
            ("place", "house") => Some(AddressCategory::HouseNumber),
            ("place", _) | ("boundary", "administrative") => Self::from_rank(rank),
            ("highway", _) => Some(AddressCategory::Road),
            (_, other) => Some(AddressCategory::Feature(other.to_string())),
        }
    }

    pub fn is_generic(place_type: &str) -> bool {
        GENERIC_TYPES.contains(&place_type)
    }

    /// Key the component is reported under.
    pub fn label(&self) -> &str {
        match self {
            AddressCategory::Country => "country",
            AddressCategory::State => "state",
            AddressCategory::StateDistrict => "state_district",
            AddressCategory::County => "county",
            AddressCategory::Municipality => "municipality",
            AddressCategory::City => "city",
            AddressCategory::Town => "town",
            AddressCategory::Village => "village",
            AddressCategory::Hamlet => "hamlet",
            AddressCategory::Suburb => "suburb",
            AddressCategory::Neighbourhood => "neighbourhood",
            AddressCategory::Road => "road",
            AddressCategory::HouseNumber => "house_number",
            AddressCategory::Postcode => "postcode",
            AddressCategory::Feature(label) => label,
        }
    }
}

/// One entry of a result's address, ordered most specific first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    /// Category label, unique within one address
    pub label: String,
    /// Localized value
    pub value: String,
    /// Place rank of the contributing place (0 for synthesized entries)
    pub rank: u8,
}

impl AddressComponent {
    pub fn new(label: &str, value: &str, rank: u8) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            rank,
        }
    }
}
