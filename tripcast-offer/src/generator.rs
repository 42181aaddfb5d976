use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tripcast_core::catalog::Airport;
use tripcast_core::itinerary::{FlightSegment, SliceDirection};
use tripcast_core::search::{RawOffer, RawSlice, TrackedQuery, TripType};
use tripcast_core::supplier::RawOfferSource;
use tripcast_store::app_config::{PricingConfig, ProviderConfig};

pub const PROVIDER_TAG: &str = "mock";

/// Route profile used to synthesize fares: base USD fare and block time.
struct RouteProfile {
    base_usd: f64,
    block_minutes: u32,
    long_haul: bool,
    hub: &'static str,
    hub_carrier: &'static str,
}

fn route_profile(iata: &str) -> RouteProfile {
    let (base_usd, block_minutes, long_haul, hub, hub_carrier) = match iata {
        "NRT" => (230.0, 270, false, "TPE", "CI"),
        "KIX" => (210.0, 250, false, "TPE", "CI"),
        "ICN" => (200.0, 235, false, "TPE", "CI"),
        "SIN" => (140.0, 200, false, "KUL", "MH"),
        "HKG" => (110.0, 140, false, "TPE", "CI"),
        "TPE" => (120.0, 135, false, "HKG", "CX"),
        "BKK" => (150.0, 200, false, "HKG", "CX"),
        "SGN" => (140.0, 170, false, "HKG", "CX"),
        "HAN" => (150.0, 185, false, "HKG", "CX"),
        "SFO" => (650.0, 780, true, "NRT", "JL"),
        "LAX" => (620.0, 760, true, "ICN", "KE"),
        "JFK" => (850.0, 960, true, "NRT", "JL"),
        "LHR" => (800.0, 900, true, "DOH", "QR"),
        "CDG" => (780.0, 880, true, "DXB", "EK"),
        "FCO" => (760.0, 870, true, "DOH", "QR"),
        _ => (300.0, 300, false, "HKG", "CX"),
    };
    RouteProfile {
        base_usd,
        block_minutes,
        long_haul,
        hub,
        hub_carrier,
    }
}

/// Peak travel months cost more out of Manila.
fn seasonal_multiplier(month: u32) -> f64 {
    match month {
        4 | 5 | 12 => 1.25,
        3 | 10 | 11 => 1.1,
        6..=9 => 0.9,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    RegionalCarrier,
    PriceTooLow,
    BrokenConnection,
}

/// Stand-in flight search. Produces plausible round trips and, for
/// long-haul routes, injects faults at `fault_rate` so quarantine gets exercised.
pub struct MockOfferSource {
    rng: Mutex<StdRng>,
    fault_rate: f64,
    currency: String,
}

impl MockOfferSource {
    pub fn new(config: &ProviderConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            fault_rate: config.fault_rate.clamp(0.0, 1.0),
            currency: PricingConfig::default().base_currency,
        }
    }

    /// Quotes base fares in `currency`.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn generate(
        &self,
        query: &TrackedQuery,
        depart_date: NaiveDate,
        destination: &Airport,
    ) -> Result<Vec<RawOffer>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = self.rng.lock().map_err(|_| "mock generator state poisoned")?;
        let profile = route_profile(&destination.iata);
        let return_date = depart_date + Duration::days(query.trip_nights as i64);
        let season = seasonal_multiplier(depart_date.month());

        let mut offers = Vec::new();

        // 1. Direct on the flag carrier
        let direct = vec![leg(&mut *rng, "PR", &query.origin, &destination.iata, depart_date, profile.block_minutes)];
        let direct_back = vec![leg(&mut *rng, "PR", &destination.iata, &query.origin, return_date, profile.block_minutes)];
        offers.push((1.0, direct, direct_back, false));

        // 2. One stop through a regional hub
        let via = connection(&mut *rng, profile.hub_carrier, &query.origin, profile.hub, &destination.iata, depart_date, profile.block_minutes);
        let via_back = connection(&mut *rng, profile.hub_carrier, &destination.iata, profile.hub, &query.origin, return_date, profile.block_minutes);
        offers.push((0.82, via, via_back, false));

        // 3. Low-cost direct on short haul only
        if !profile.long_haul {
            let carrier = if rng.gen_bool(0.5) { "5J" } else { "Z2" };
            let lcc = vec![leg(&mut *rng, carrier, &query.origin, &destination.iata, depart_date, profile.block_minutes)];
            let lcc_back = vec![leg(&mut *rng, carrier, &destination.iata, &query.origin, return_date, profile.block_minutes)];
            offers.push((0.62, lcc, lcc_back, true));
        }

        let mut raw_offers = Vec::with_capacity(offers.len());
        for (fare_factor, outbound, inbound, low_cost) in offers {
            let jitter = rng.gen_range(0.88..1.15);
            let mut raw = RawOffer {
                provider: PROVIDER_TAG.to_string(),
                origin: query.origin.clone(),
                destination: destination.iata.clone(),
                base_price: (profile.base_usd * fare_factor * season * jitter).round(),
                base_currency: self.currency.clone(),
                passengers: query.passengers,
                cabin: query.cabin,
                trip_type: TripType::RoundTrip,
                depart_date,
                return_date: Some(return_date),
                slices: vec![
                    RawSlice {
                        direction: SliceDirection::Outbound,
                        segments: outbound,
                    },
                    RawSlice {
                        direction: SliceDirection::Inbound,
                        segments: inbound,
                    },
                ],
                separate_tickets: Some(false),
                low_cost_carrier: Some(low_cost),
                baggage_unknown: Some(low_cost),
            };

            if profile.long_haul && rng.gen_bool(self.fault_rate) {
                let fault = match rng.gen_range(0..3) {
                    0 => Fault::RegionalCarrier,
                    1 => Fault::PriceTooLow,
                    _ => Fault::BrokenConnection,
                };
                inject(&mut raw, fault);
                tracing::debug!("Injected {:?} into mock offer to {}", fault, destination.iata);
            }

            raw_offers.push(raw);
        }

        Ok(raw_offers)
    }
}

fn inject(raw: &mut RawOffer, fault: Fault) {
    match fault {
        Fault::RegionalCarrier => {
            if let Some(segment) = raw.slices[0].segments.first_mut() {
                segment.carrier_code = "5J".to_string();
            }
        }
        Fault::PriceTooLow => raw.base_price = 150.0,
        Fault::BrokenConnection => {
            let segments = &mut raw.slices[0].segments;
            if segments.len() > 1 {
                segments[1].from_iata = "XXX".to_string();
            } else {
                raw.slices.truncate(1);
            }
        }
    }
}

fn leg(rng: &mut StdRng, carrier: &str, from: &str, to: &str, date: NaiveDate, minutes: u32) -> FlightSegment {
    let hour = rng.gen_range(6..22);
    let depart_at = date.and_hms_opt(hour, 0, 0).unwrap_or_default().and_utc();
    FlightSegment {
        carrier_code: carrier.to_string(),
        flight_number: format!("{}{}", carrier, rng.gen_range(100..1000)),
        from_iata: from.to_string(),
        to_iata: to.to_string(),
        depart_at,
        arrive_at: depart_at + Duration::minutes(minutes as i64),
        duration_minutes: minutes,
    }
}

/// Two legs through `hub` with a layover between them.
fn connection(
    rng: &mut StdRng,
    carrier: &str,
    from: &str,
    hub: &str,
    to: &str,
    date: NaiveDate,
    block_minutes: u32,
) -> Vec<FlightSegment> {
    let first = leg(rng, carrier, from, hub, date, block_minutes * 35 / 100);
    let layover = Duration::minutes(rng.gen_range(75..240));
    let second_minutes = block_minutes * 80 / 100;
    let second_depart = first.arrive_at + layover;
    let second = FlightSegment {
        carrier_code: carrier.to_string(),
        flight_number: format!("{}{}", carrier, rng.gen_range(100..1000)),
        from_iata: hub.to_string(),
        to_iata: to.to_string(),
        depart_at: second_depart,
        arrive_at: second_depart + Duration::minutes(second_minutes as i64),
        duration_minutes: second_minutes,
    };
    vec![first, second]
}

#[async_trait]
impl RawOfferSource for MockOfferSource {
    async fn search_offers(
        &self,
        query: &TrackedQuery,
        depart_date: NaiveDate,
        destination: &Airport,
    ) -> Result<Vec<RawOffer>, Box<dyn std::error::Error + Send + Sync>> {
        self.generate(query, depart_date, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::OfferPipeline;
    use tripcast_core::search::Passengers;

    fn airport(iata: &str) -> Airport {
        Airport {
            iata: iata.to_string(),
            city: iata.to_string(),
        }
    }

    fn source(fault_rate: f64) -> MockOfferSource {
        MockOfferSource::new(&ProviderConfig {
            seed: Some(7),
            fault_rate,
        })
    }

    #[tokio::test]
    async fn test_clean_offers_validate() {
        let source = source(0.0);
        let pipeline = OfferPipeline::default();
        let query = TrackedQuery::new("MNL", 5, Passengers::default());
        let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();

        for iata in ["NRT", "SIN", "SFO", "LHR"] {
            let raw = source.search_offers(&query, date, &airport(iata)).await.unwrap();
            assert!(!raw.is_empty());
            for offer in raw.into_iter().map(|r| pipeline.process(r)) {
                assert!(offer.is_valid(), "{} offer quarantined: {:?}", iata, offer.validation);
                assert_eq!(offer.return_date, NaiveDate::from_ymd_opt(2025, 2, 19));
            }
        }
    }

    #[tokio::test]
    async fn test_faults_are_quarantined() {
        let source = source(1.0);
        let pipeline = OfferPipeline::default();
        let query = TrackedQuery::new("MNL", 5, Passengers::default());
        let date = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();

        for _ in 0..10 {
            let raw = source.search_offers(&query, date, &airport("JFK")).await.unwrap();
            assert!(raw.into_iter().map(|r| pipeline.process(r)).all(|o| !o.is_valid()));
        }

        // Short haul never gets faults
        let raw = source.search_offers(&query, date, &airport("HKG")).await.unwrap();
        assert_eq!(raw.len(), 3);
        assert!(raw.into_iter().map(|r| pipeline.process(r)).all(|o| o.is_valid()));
    }

    #[tokio::test]
    async fn test_seeded_output_is_repeatable() {
        let query = TrackedQuery::new("MNL", 5, Passengers::default());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let a = source(0.1).search_offers(&query, date, &airport("ICN")).await.unwrap();
        let b = source(0.1).search_offers(&query, date, &airport("ICN")).await.unwrap();
        let prices_a: Vec<f64> = a.iter().map(|o| o.base_price).collect();
        let prices_b: Vec<f64> = b.iter().map(|o| o.base_price).collect();
        assert_eq!(prices_a, prices_b);
    }

    #[tokio::test]
    async fn test_quotes_configured_currency() {
        let query = TrackedQuery::new("MNL", 5, Passengers::default());
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let raw = source(0.0).search_offers(&query, date, &airport("SIN")).await.unwrap();
        assert!(raw.iter().all(|o| o.base_currency == "USD"));

        let raw = source(0.0)
            .with_currency("EUR")
            .search_offers(&query, date, &airport("SIN"))
            .await
            .unwrap();
        assert!(raw.iter().all(|o| o.base_currency == "EUR"));
    }
}
