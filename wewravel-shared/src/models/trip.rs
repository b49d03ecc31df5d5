use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type TripId = i64;

/// A named accommodation option and its per-traveler price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub room_type: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day_number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A sellable travel package, owned and served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub pricing: Vec<PricingTier>,
}

impl Trip {
    /// The first tier is advertised as the starting price.
    pub fn starting_price(&self) -> Option<Decimal> {
        self.pricing.first().map(|tier| tier.price)
    }

    pub fn tier(&self, room_type: &str) -> Option<&PricingTier> {
        self.pricing.iter().find(|tier| tier.room_type == room_type)
    }

    /// Case-insensitive match on title or location.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self
                .location
                .as_deref()
                .is_some_and(|location| location.to_lowercase().contains(&term))
    }
}
