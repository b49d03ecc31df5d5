use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use wewravel_shared::Trip;

/// Cost of a booking and the deposit collected up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    pub total_cost: Decimal,
    pub booking_amount: Decimal,
}

impl BookingQuote {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.total_cost.is_zero()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Share of the total collected at booking time.
    pub deposit_rate: Decimal,
    pub min_travelers: u32,
    pub max_travelers: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            deposit_rate: Decimal::new(30, 2),
            min_travelers: 1,
            max_travelers: 10,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Room type {0} is not offered on this trip")]
    UnknownRoomType(String),

    #[error("Travelers must be between {min} and {max}, got {got}")]
    TravelersOutOfRange { min: u32, max: u32, got: u32 },
}

pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn check_travelers(&self, travelers: u32) -> Result<(), PricingError> {
        if travelers < self.config.min_travelers || travelers > self.config.max_travelers {
            return Err(PricingError::TravelersOutOfRange {
                min: self.config.min_travelers,
                max: self.config.max_travelers,
                got: travelers,
            });
        }
        Ok(())
    }

    /// Deposit rounded to paise, halves away from zero.
    pub fn deposit_for(&self, total_cost: Decimal) -> Decimal {
        (total_cost * self.config.deposit_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Price `travelers` on the tier named `room_type`. An empty room type
    /// quotes zero.
    pub fn quote(&self, trip: &Trip, room_type: &str, travelers: u32) -> Result<BookingQuote, PricingError> {
        if room_type.is_empty() {
            return Ok(BookingQuote::zero());
        }
        self.check_travelers(travelers)?;
        let tier = trip
            .tier(room_type)
            .ok_or_else(|| PricingError::UnknownRoomType(room_type.to_string()))?;

        let total_cost = tier.price * Decimal::from(travelers);
        Ok(BookingQuote {
            total_cost,
            booking_amount: self.deposit_for(total_cost),
        })
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wewravel_shared::PricingTier;

    fn trip(tiers: &[(&str, Decimal)]) -> Trip {
        Trip {
            id: 1,
            title: "Spiti Circuit".into(),
            location: None,
            duration: None,
            description: String::new(),
            image_url: None,
            itinerary: vec![],
            inclusions: vec![],
            exclusions: vec![],
            pricing: tiers
                .iter()
                .map(|(room, price)| PricingTier { room_type: room.to_string(), price: *price })
                .collect(),
        }
    }

    #[test]
    fn deluxe_for_two() {
        let engine = PricingEngine::default();
        let quote = engine
            .quote(&trip(&[("Deluxe", Decimal::from(10000))]), "Deluxe", 2)
            .unwrap();
        assert_eq!(quote.total_cost, Decimal::from(20000));
        assert_eq!(quote.booking_amount, Decimal::from(6000));
    }

    #[test]
    fn total_is_price_times_travelers_for_every_count() {
        let engine = PricingEngine::default();
        let price = Decimal::new(799_95, 2);
        let t = trip(&[("Quad", price)]);
        for n in 1..=10u32 {
            let quote = engine.quote(&t, "Quad", n).unwrap();
            let total = price * Decimal::from(n);
            assert_eq!(quote.total_cost, total);
            assert_eq!(
                quote.booking_amount,
                (total * Decimal::new(3, 1)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            );
            assert!(quote.booking_amount.scale() <= 2);
        }
    }

    #[test]
    fn deposit_rounds_half_up() {
        let engine = PricingEngine::default();
        // 0.35 * 0.30 = 0.105
        assert_eq!(engine.deposit_for(Decimal::new(35, 2)), Decimal::new(11, 2));
    }

    #[test]
    fn empty_room_type_quotes_zero() {
        let engine = PricingEngine::default();
        let quote = engine.quote(&trip(&[("Deluxe", Decimal::from(10000))]), "", 7).unwrap();
        assert!(quote.is_zero());
        assert!(quote.booking_amount.is_zero());
    }

    #[test]
    fn rejects_unknown_tier_and_bad_counts() {
        let engine = PricingEngine::default();
        let t = trip(&[("Deluxe", Decimal::from(10000))]);
        assert_eq!(
            engine.quote(&t, "Suite", 1),
            Err(PricingError::UnknownRoomType("Suite".into()))
        );
        assert!(engine.quote(&t, "Deluxe", 0).is_err());
        assert!(engine.quote(&t, "Deluxe", 11).is_err());
    }
}
