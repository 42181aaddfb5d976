//! Builders shared by the pipeline tests.

use chrono::{Duration, NaiveDate};
use tripcast_core::itinerary::{FlightSegment, SliceDirection};
use tripcast_core::search::{CabinClass, Passengers, RawOffer, RawSlice, TripType};

pub fn segment(carrier: &str, from: &str, to: &str, date: NaiveDate, minutes: u32) -> FlightSegment {
    let depart_at = date.and_hms_opt(8, 0, 0).unwrap().and_utc();
    FlightSegment {
        carrier_code: carrier.to_string(),
        flight_number: format!("{}123", carrier),
        from_iata: from.to_string(),
        to_iata: to.to_string(),
        depart_at,
        arrive_at: depart_at + Duration::minutes(minutes as i64),
        duration_minutes: minutes,
    }
}

/// Direct round trip MNL <-> `destination` on one carrier.
pub fn raw_round_trip(destination: &str, carrier: &str, base_price: f64) -> RawOffer {
    let depart = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    let back = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    RawOffer {
        provider: "fixture".to_string(),
        origin: "MNL".to_string(),
        destination: destination.to_string(),
        base_price,
        base_currency: "USD".to_string(),
        passengers: Passengers::default(),
        cabin: CabinClass::Economy,
        trip_type: TripType::RoundTrip,
        depart_date: depart,
        return_date: Some(back),
        slices: vec![
            RawSlice {
                direction: SliceDirection::Outbound,
                segments: vec![segment(carrier, "MNL", destination, depart, 240)],
            },
            RawSlice {
                direction: SliceDirection::Inbound,
                segments: vec![segment(carrier, destination, "MNL", back, 240)],
            },
        ],
        separate_tickets: None,
        low_cost_carrier: None,
        baggage_unknown: None,
    }
}

/// Round trip with an extra connection through `hub` on the outbound.
pub fn raw_one_stop(destination: &str, hub: &str, carrier: &str, base_price: f64) -> RawOffer {
    let mut raw = raw_round_trip(destination, carrier, base_price);
    let depart = raw.depart_date;
    raw.slices[0].segments = vec![
        segment(carrier, "MNL", hub, depart, 180),
        segment(carrier, hub, destination, depart, 300),
    ];
    raw
}
