use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::itinerary::{FlightSegment, SliceDirection};
use crate::{CoreError, CoreResult};

/// Hard cap on travellers in a single booking.
pub const MAX_PASSENGERS: u8 = 9;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    RoundTrip,
    OneWay,
}

/// Traveller counts for a search. Immutable once validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passengers {
    pub adults: u8,
    #[serde(default)]
    pub children: u8,
    #[serde(default)]
    pub infants_in_seat: u8,
    #[serde(default)]
    pub infants_on_lap: u8,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants_in_seat: 0,
            infants_on_lap: 0,
        }
    }
}

impl Passengers {
    pub fn new(adults: u8, children: u8, infants_in_seat: u8, infants_on_lap: u8) -> CoreResult<Self> {
        let passengers = Self {
            adults,
            children,
            infants_in_seat,
            infants_on_lap,
        };
        passengers.validate()?;
        Ok(passengers)
    }

    pub fn total(&self) -> u32 {
        self.adults as u32
            + self.children as u32
            + self.infants_in_seat as u32
            + self.infants_on_lap as u32
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.adults < 1 {
            return Err(CoreError::ValidationError(
                "at least one adult is required".to_string(),
            ));
        }
        if self.total() > MAX_PASSENGERS as u32 {
            return Err(CoreError::ValidationError(format!(
                "{} passengers requested, maximum is {}",
                self.total(),
                MAX_PASSENGERS
            )));
        }
        if self.infants_on_lap > self.adults {
            return Err(CoreError::ValidationError(
                "each lap infant needs an accompanying adult".to_string(),
            ));
        }
        Ok(())
    }

    /// Fare multiplier applied to a single-adult base fare.
    ///
    /// Children pay 75% of the adult fare; every infant, seated or on a lap,
    /// pays 10%.
    pub fn price_multiplier(&self) -> f64 {
        self.adults as f64 * 1.0
            + self.children as f64 * 0.75
            + (self.infants_in_seat as f64 + self.infants_on_lap as f64) * 0.1
    }

    /// Short human readable summary, e.g. `2 adults, 1 child, 1 lap infant`.
    pub fn summary(&self) -> String {
        fn part(count: u8, singular: &str, plural: &str) -> Option<String> {
            match count {
                0 => None,
                1 => Some(format!("1 {}", singular)),
                n => Some(format!("{} {}", n, plural)),
            }
        }

        [
            part(self.adults, "adult", "adults"),
            part(self.children, "child", "children"),
            part(self.infants_in_seat, "seated infant", "seated infants"),
            part(self.infants_on_lap, "lap infant", "lap infants"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A saved search the planner keeps re-evaluating across the year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedQuery {
    pub origin: String,
    pub trip_nights: u32,
    #[serde(default)]
    pub cabin: CabinClass,
    /// Stored with the query; not applied as a filter yet.
    #[serde(default)]
    pub max_stops: Option<u32>,
    #[serde(default = "default_diversify")]
    pub diversify: bool,
    #[serde(default)]
    pub passengers: Passengers,
}

fn default_diversify() -> bool {
    true
}

impl TrackedQuery {
    pub fn new(origin: impl Into<String>, trip_nights: u32, passengers: Passengers) -> Self {
        Self {
            origin: origin.into(),
            trip_nights,
            cabin: CabinClass::Economy,
            max_stops: None,
            diversify: true,
            passengers,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !is_iata_code(&self.origin) {
            return Err(CoreError::ValidationError(format!(
                "origin '{}' is not a three-letter airport code",
                self.origin
            )));
        }
        if self.trip_nights == 0 {
            return Err(CoreError::ValidationError(
                "trip length must be at least one night".to_string(),
            ));
        }
        self.passengers.validate()
    }
}

pub fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

// ============================================================================
// Raw provider results
// ============================================================================

/// One directional leg exactly as a provider reported it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSlice {
    pub direction: SliceDirection,
    pub segments: Vec<FlightSegment>,
}

/// A search result before normalization.
///
/// The base fare is a single-adult fare in the provider's reference currency;
/// passenger multipliers and currency conversion happen in the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOffer {
    pub provider: String,
    pub origin: String,
    pub destination: String,
    pub base_price: f64,
    pub base_currency: String,
    pub passengers: Passengers,
    pub cabin: CabinClass,
    pub trip_type: TripType,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub slices: Vec<RawSlice>,
    #[serde(default)]
    pub separate_tickets: Option<bool>,
    #[serde(default)]
    pub low_cost_carrier: Option<bool>,
    #[serde(default)]
    pub baggage_unknown: Option<bool>,
}
